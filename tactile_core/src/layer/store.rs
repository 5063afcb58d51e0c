// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layer storage with allocation, topology, and property management.

use alloc::vec::Vec;

use kurbo::{Affine, Vec2};

use super::clip::HitShape;
use super::id::{INVALID, LayerId};
use super::listener::{Capability, Listener, ListenerKey, Listeners};
use super::traverse::Children;

/// Per-layer boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFlags {
    /// Whether the layer (and its subtree) is hidden. Hidden subtrees never
    /// take part in hit testing.
    pub hidden: bool,
    /// Whether the layer (and its subtree) takes part in hit testing.
    ///
    /// Registering a listener on a layer sets this flag on the layer and all
    /// of its ancestors.
    pub interactive: bool,
}

/// Struct-of-arrays storage for all layers.
///
/// Layers are addressed by [`LayerId`] handles. Internally, each layer occupies
/// a slot in parallel arrays. Destroyed layers are recycled via a free list,
/// and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct LayerStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties --
    pub(crate) transform: Vec<Affine>,
    pub(crate) origin: Vec<Vec2>,
    pub(crate) hit_shape: Vec<Option<HitShape>>,
    pub(crate) flags: Vec<LayerFlags>,

    // -- Interaction --
    pub(crate) listeners: Vec<Listeners>,
    pub(crate) next_listener_key: u64,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Creates an empty layer store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            transform: Vec::new(),
            origin: Vec::new(),
            hit_shape: Vec::new(),
            flags: Vec::new(),
            listeners: Vec::new(),
            next_listener_key: 0,
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a new layer and returns its handle.
    ///
    /// The layer starts with an identity transform, a zero origin, no hit
    /// shape, default flags (visible, not interactive), no listeners, and no
    /// parent.
    pub fn create_layer(&mut self) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. The generation was bumped on destroy.
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.transform[idx as usize] = Affine::IDENTITY;
            self.origin[idx as usize] = Vec2::ZERO;
            self.hit_shape[idx as usize] = None;
            self.flags[idx as usize] = LayerFlags::default();
            self.listeners[idx as usize].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.transform.push(Affine::IDENTITY);
            self.origin.push(Vec2::ZERO);
            self.hit_shape.push(None);
            self.flags.push(LayerFlags::default());
            self.listeners.push(Listeners::default());
            self.generation.push(0);
            idx
        };

        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a layer, freeing its slot for reuse.
    ///
    /// The layer's listeners are dropped immediately. Handles to the layer,
    /// including those remembered by a pointer dispatcher, become stale.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy layer with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        self.listeners[idx as usize].clear();

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last (topmost) child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        self.validate(parent);
        self.validate(child);
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        self.link_last(parent.idx, c);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer has no parent.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "layer has no parent");
        self.unlink_from_parent(c);
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn reparent(&mut self, child: LayerId, new_parent: LayerId) {
        self.validate(child);
        self.validate(new_parent);

        if self.parent[child.idx as usize] != INVALID {
            self.unlink_from_parent(child.idx);
        }
        self.link_last(new_parent.idx, child.idx);
    }

    /// Inserts `child` before `sibling` in the sibling list, so that it is
    /// drawn (and hit-tested) beneath `sibling`.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: LayerId, sibling: LayerId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;
        self.propagate_interactive(c);
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        self.handle_at(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a layer, bottom-most
    /// first. Use [`rev`](Iterator::rev) to walk them topmost first.
    #[must_use]
    pub fn children(&self, id: LayerId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the live layers that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<LayerId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(LayerId {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Property getters --

    /// Returns the transform from the layer's space into its parent's space
    /// (applied after the origin offset is subtracted).
    #[must_use]
    pub fn transform(&self, id: LayerId) -> Affine {
        self.validate(id);
        self.transform[id.idx as usize]
    }

    /// Returns the layer's origin: the local point that the transform maps
    /// to the parent-space position of the layer.
    #[must_use]
    pub fn origin(&self, id: LayerId) -> Vec2 {
        self.validate(id);
        self.origin[id.idx as usize]
    }

    /// Returns the local-space hit shape of a layer.
    #[must_use]
    pub fn hit_shape(&self, id: LayerId) -> Option<HitShape> {
        self.validate(id);
        self.hit_shape[id.idx as usize]
    }

    /// Returns the flags of a layer.
    #[must_use]
    pub fn flags(&self, id: LayerId) -> LayerFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns whether the layer takes part in hit testing.
    #[must_use]
    pub fn interactive(&self, id: LayerId) -> bool {
        self.validate(id);
        self.flags[id.idx as usize].interactive
    }

    // -- Mutation API --

    /// Sets the transform of a layer.
    pub fn set_transform(&mut self, id: LayerId, transform: Affine) {
        self.validate(id);
        self.transform[id.idx as usize] = transform;
    }

    /// Sets the origin of a layer.
    pub fn set_origin(&mut self, id: LayerId, origin: Vec2) {
        self.validate(id);
        self.origin[id.idx as usize] = origin;
    }

    /// Sets the local-space hit shape of a layer.
    pub fn set_hit_shape(&mut self, id: LayerId, shape: Option<HitShape>) {
        self.validate(id);
        self.hit_shape[id.idx as usize] = shape;
    }

    /// Sets the flags of a layer.
    pub fn set_flags(&mut self, id: LayerId, flags: LayerFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
        self.propagate_interactive(id.idx);
    }

    /// Sets whether the layer takes part in hit testing.
    ///
    /// Making a layer interactive also makes its ancestors interactive.
    /// Clearing the flag only touches this layer.
    pub fn set_interactive(&mut self, id: LayerId, interactive: bool) {
        self.validate(id);
        self.flags[id.idx as usize].interactive = interactive;
        self.propagate_interactive(id.idx);
    }

    /// Sets whether the layer is hidden.
    pub fn set_hidden(&mut self, id: LayerId, hidden: bool) {
        self.validate(id);
        self.flags[id.idx as usize].hidden = hidden;
    }

    // -- Listener API --

    /// Registers `listener` on a layer and returns a key for removing it.
    ///
    /// The layer and all of its ancestors become interactive, so the layer is
    /// reachable by hit testing from the root. Ancestors gained later by
    /// attaching the layer to a parent are marked as well.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn add_listener(&mut self, id: LayerId, listener: Listener) -> ListenerKey {
        self.validate(id);
        let key = ListenerKey(self.next_listener_key);
        self.next_listener_key += 1;
        self.listeners[id.idx as usize].push(key, listener);
        self.flags[id.idx as usize].interactive = true;
        self.propagate_interactive(id.idx);
        key
    }

    /// Removes a listener previously registered on this layer.
    ///
    /// Returns `false` if `key` is not registered on the layer. The layer's
    /// interactive flag is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_listener(&mut self, id: LayerId, key: ListenerKey) -> bool {
        self.validate(id);
        self.listeners[id.idx as usize].remove(key)
    }

    /// Removes every listener registered on a layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn clear_listeners(&mut self, id: LayerId) {
        self.validate(id);
        self.listeners[id.idx as usize].clear();
    }

    /// Returns whether any listener is registered on the layer.
    #[must_use]
    pub fn has_listeners(&self, id: LayerId) -> bool {
        self.validate(id);
        !self.listeners[id.idx as usize].is_empty()
    }

    /// Returns the number of listeners registered on the layer for
    /// `capability`.
    #[must_use]
    pub fn listener_count(&self, id: LayerId, capability: Capability) -> usize {
        self.validate(id);
        self.listeners[id.idx as usize].count(capability)
    }

    /// Calls `f` once for each listener registered on the layer for
    /// `capability`, in registration order, and returns how many calls were
    /// made.
    ///
    /// The list is captured when the call starts: listeners registered by a
    /// callback wait for the next dispatch. A listener removed by an earlier
    /// callback is skipped, and the walk stops if a callback destroys the
    /// layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn interact(
        &mut self,
        id: LayerId,
        capability: Capability,
        mut f: impl FnMut(&mut Self, &Listener),
    ) -> usize {
        self.validate(id);
        let snapshot = self.listeners[id.idx as usize].snapshot(capability);
        let mut calls = 0;
        for (key, listener) in &snapshot {
            if !self.is_alive(id) {
                break;
            }
            if !self.listeners[id.idx as usize].contains(capability, *key) {
                continue;
            }
            f(self, listener);
            calls += 1;
        }
        calls
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale LayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Returns the live handle for raw slot `idx`, or `None` for [`INVALID`].
    pub(crate) fn handle_at(&self, idx: u32) -> Option<LayerId> {
        if idx == INVALID {
            None
        } else {
            Some(LayerId {
                idx,
                generation: self.generation[idx as usize],
            })
        }
    }

    /// Appends `c` as the last child of `p`. `c` must be detached.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
        self.propagate_interactive(c);
    }

    /// Marks every ancestor of an interactive layer as interactive.
    fn propagate_interactive(&mut self, idx: u32) {
        if !self.flags[idx as usize].interactive {
            return;
        }
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            self.flags[p as usize].interactive = true;
            p = self.parent[p as usize];
        }
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}
