// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability-filtered listener registry.
//!
//! Each layer keeps one ordered list of listeners per [`Capability`]. A
//! listener is a callback for exactly one capability; attaching a "listener
//! object" that handles several kinds of input means registering one
//! [`Listener`] per capability. Dispatch for a capability walks only that
//! capability's list, in registration order.
//!
//! Callbacks receive the [`LayerStore`] mutably, so they may restructure the
//! tree, register or remove listeners (including themselves), or destroy
//! layers while being dispatched.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use super::store::LayerStore;
use crate::event::{ButtonEvent, MotionEvent, WheelEvent};

/// The kind of input a listener handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Capability {
    /// A button was pressed over the layer.
    MouseDown,
    /// The button pressed over the layer was released.
    MouseUp,
    /// The pointer moved over the layer with no button held.
    MouseMove,
    /// The pointer moved while a button pressed over the layer is held.
    MouseDrag,
    /// The pointer entered the layer.
    MouseOver,
    /// The pointer left the layer.
    MouseOut,
    /// The wheel scrolled while the layer was pressed or hovered.
    MouseWheel,
}

impl Capability {
    /// Every capability, in declaration order, so that
    /// `ALL[c.code() as usize] == c`.
    pub const ALL: [Self; 7] = [
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseMove,
        Self::MouseDrag,
        Self::MouseOver,
        Self::MouseOut,
        Self::MouseWheel,
    ];

    /// Short lowercase name, for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseDown => "down",
            Self::MouseUp => "up",
            Self::MouseMove => "move",
            Self::MouseDrag => "drag",
            Self::MouseOver => "over",
            Self::MouseOut => "out",
            Self::MouseWheel => "wheel",
        }
    }

    /// Stable numeric code: the position in [`ALL`](Self::ALL).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Callback type for button capabilities.
pub type ButtonHandler = dyn FnMut(&mut LayerStore, &mut ButtonEvent);
/// Callback type for motion capabilities.
pub type MotionHandler = dyn FnMut(&mut LayerStore, &mut MotionEvent);
/// Callback type for the wheel capability.
pub type WheelHandler = dyn FnMut(&mut LayerStore, &mut WheelEvent);

/// A callback registered for a single [`Capability`].
///
/// Cloning a `Listener` clones the handle, not the callback: both copies
/// invoke the same closure.
#[derive(Clone)]
pub enum Listener {
    /// Handles [`Capability::MouseDown`].
    MouseDown(Rc<RefCell<ButtonHandler>>),
    /// Handles [`Capability::MouseUp`].
    MouseUp(Rc<RefCell<ButtonHandler>>),
    /// Handles [`Capability::MouseMove`].
    MouseMove(Rc<RefCell<MotionHandler>>),
    /// Handles [`Capability::MouseDrag`].
    MouseDrag(Rc<RefCell<MotionHandler>>),
    /// Handles [`Capability::MouseOver`].
    MouseOver(Rc<RefCell<MotionHandler>>),
    /// Handles [`Capability::MouseOut`].
    MouseOut(Rc<RefCell<MotionHandler>>),
    /// Handles [`Capability::MouseWheel`].
    MouseWheel(Rc<RefCell<WheelHandler>>),
}

impl Listener {
    /// Creates a [`Capability::MouseDown`] listener.
    pub fn mouse_down(f: impl FnMut(&mut LayerStore, &mut ButtonEvent) + 'static) -> Self {
        Self::MouseDown(Rc::new(RefCell::new(f)))
    }

    /// Creates a [`Capability::MouseUp`] listener.
    pub fn mouse_up(f: impl FnMut(&mut LayerStore, &mut ButtonEvent) + 'static) -> Self {
        Self::MouseUp(Rc::new(RefCell::new(f)))
    }

    /// Creates a [`Capability::MouseMove`] listener.
    pub fn mouse_move(f: impl FnMut(&mut LayerStore, &mut MotionEvent) + 'static) -> Self {
        Self::MouseMove(Rc::new(RefCell::new(f)))
    }

    /// Creates a [`Capability::MouseDrag`] listener.
    pub fn mouse_drag(f: impl FnMut(&mut LayerStore, &mut MotionEvent) + 'static) -> Self {
        Self::MouseDrag(Rc::new(RefCell::new(f)))
    }

    /// Creates a [`Capability::MouseOver`] listener.
    pub fn mouse_over(f: impl FnMut(&mut LayerStore, &mut MotionEvent) + 'static) -> Self {
        Self::MouseOver(Rc::new(RefCell::new(f)))
    }

    /// Creates a [`Capability::MouseOut`] listener.
    pub fn mouse_out(f: impl FnMut(&mut LayerStore, &mut MotionEvent) + 'static) -> Self {
        Self::MouseOut(Rc::new(RefCell::new(f)))
    }

    /// Creates a [`Capability::MouseWheel`] listener.
    pub fn mouse_wheel(f: impl FnMut(&mut LayerStore, &mut WheelEvent) + 'static) -> Self {
        Self::MouseWheel(Rc::new(RefCell::new(f)))
    }

    /// The capability this listener is registered under.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::MouseDown(_) => Capability::MouseDown,
            Self::MouseUp(_) => Capability::MouseUp,
            Self::MouseMove(_) => Capability::MouseMove,
            Self::MouseDrag(_) => Capability::MouseDrag,
            Self::MouseOver(_) => Capability::MouseOver,
            Self::MouseOut(_) => Capability::MouseOut,
            Self::MouseWheel(_) => Capability::MouseWheel,
        }
    }

    /// Invokes a button listener. Returns `false` (without calling anything)
    /// if this is not a button listener or if it is already running.
    pub fn call_button(&self, store: &mut LayerStore, event: &mut ButtonEvent) -> bool {
        match self {
            Self::MouseDown(h) | Self::MouseUp(h) => match h.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut *f)(store, event);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }

    /// Invokes a motion listener. Returns `false` (without calling anything)
    /// if this is not a motion listener or if it is already running.
    pub fn call_motion(&self, store: &mut LayerStore, event: &mut MotionEvent) -> bool {
        match self {
            Self::MouseMove(h) | Self::MouseDrag(h) | Self::MouseOver(h) | Self::MouseOut(h) => {
                match h.try_borrow_mut() {
                    Ok(mut f) => {
                        (&mut *f)(store, event);
                        true
                    }
                    Err(_) => false,
                }
            }
            _ => false,
        }
    }

    /// Invokes a wheel listener. Returns `false` (without calling anything)
    /// if this is not a wheel listener or if it is already running.
    pub fn call_wheel(&self, store: &mut LayerStore, event: &mut WheelEvent) -> bool {
        match self {
            Self::MouseWheel(h) => match h.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut *f)(store, event);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&self.capability())
            .finish()
    }
}

/// Identifies a registration made with
/// [`LayerStore::add_listener`](super::LayerStore::add_listener).
///
/// Keys are unique for the lifetime of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerKey(pub(crate) u64);

/// Per-layer listener lists, one per capability.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    lists: [Vec<(ListenerKey, Listener)>; Capability::ALL.len()],
}

impl Listeners {
    pub(crate) fn push(&mut self, key: ListenerKey, listener: Listener) {
        self.lists[listener.capability().index()].push((key, listener));
    }

    pub(crate) fn remove(&mut self, key: ListenerKey) -> bool {
        for list in &mut self.lists {
            if let Some(pos) = list.iter().position(|(k, _)| *k == key) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    pub(crate) fn contains(&self, capability: Capability, key: ListenerKey) -> bool {
        self.lists[capability.index()]
            .iter()
            .any(|(k, _)| *k == key)
    }

    pub(crate) fn snapshot(&self, capability: Capability) -> Vec<(ListenerKey, Listener)> {
        self.lists[capability.index()].clone()
    }

    pub(crate) fn count(&self, capability: Capability) -> usize {
        self.lists[capability.index()].len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    pub(crate) fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for capability in Capability::ALL {
            let n = self.count(capability);
            if n > 0 {
                map.entry(&capability, &n);
            }
        }
        map.finish()
    }
}
