// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and coordinate conversion.
//!
//! A layer's local space relates to its parent's space through its transform
//! and origin:
//!
//! ```text
//! parent = transform * (local - origin)
//! local  = transform⁻¹ * parent + origin
//! ```
//!
//! "Screen" space is the space of the tree's root parent, i.e. the space the
//! platform reports device coordinates in.
//!
//! Hit testing walks children topmost first (reverse child order), converts
//! the point into each child's local space, and returns the deepest layer
//! whose hit shape contains it. Subtrees that are not interactive, are hidden,
//! or sit under a non-invertible transform are skipped.

use kurbo::{Affine, Point};

use super::id::{INVALID, LayerId};
use super::store::LayerStore;
use super::traverse::Children;

/// Returns whether `affine` can be inverted without producing non-finite
/// values.
fn is_invertible(affine: Affine) -> bool {
    let det = affine.determinant();
    det != 0.0 && det.is_finite() && affine.is_finite()
}

impl LayerStore {
    /// Returns the deepest interactive, visible layer under `point`, where
    /// `point` is expressed in `id`'s local space.
    ///
    /// `id` itself may be the result if no descendant is hit and its own hit
    /// shape contains the point. Returns `None` if `id` is not interactive or
    /// is hidden.
    ///
    /// The walk recurses once per tree level, so its stack use grows with the
    /// depth of the tree below `id`. Trees thousands of levels deep may
    /// overflow the stack.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn hit_test(&self, id: LayerId, point: Point) -> Option<LayerId> {
        self.validate(id);
        self.hit_test_at(id.idx, point)
            .and_then(|idx| self.handle_at(idx))
    }

    /// Converts a point from the parent's space into `id`'s local space.
    ///
    /// Returns `None` if the layer's transform is not invertible.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent_to_layer(&self, id: LayerId, point: Point) -> Option<Point> {
        self.validate(id);
        self.parent_to_layer_at(id.idx, point)
    }

    /// Converts a point from `id`'s local space into its parent's space.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn layer_to_parent(&self, id: LayerId, point: Point) -> Point {
        self.validate(id);
        self.layer_to_parent_at(id.idx, point)
    }

    /// Converts a screen-space point into `id`'s local space by walking down
    /// from the layer's root.
    ///
    /// Returns `None` if any transform along the way is not invertible.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn screen_to_layer(&self, id: LayerId, point: Point) -> Option<Point> {
        self.validate(id);
        self.screen_to_layer_at(id.idx, point)
    }

    /// Converts a point in `id`'s local space into screen space.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn layer_to_screen(&self, id: LayerId, point: Point) -> Point {
        self.validate(id);
        let mut idx = id.idx;
        let mut p = point;
        while idx != INVALID {
            p = self.layer_to_parent_at(idx, p);
            idx = self.parent[idx as usize];
        }
        p
    }

    fn hit_test_at(&self, idx: u32, point: Point) -> Option<u32> {
        let flags = self.flags[idx as usize];
        if !flags.interactive || flags.hidden {
            return None;
        }
        for child in Children::new(self, self.first_child[idx as usize]).rev() {
            let Some(p) = self.parent_to_layer_at(child.idx, point) else {
                continue;
            };
            if let Some(hit) = self.hit_test_at(child.idx, p) {
                return Some(hit);
            }
        }
        match self.hit_shape[idx as usize] {
            Some(shape) if shape.contains(point) => Some(idx),
            _ => None,
        }
    }

    fn parent_to_layer_at(&self, idx: u32, point: Point) -> Option<Point> {
        let transform = self.transform[idx as usize];
        if !is_invertible(transform) {
            return None;
        }
        Some(transform.inverse() * point + self.origin[idx as usize])
    }

    fn layer_to_parent_at(&self, idx: u32, point: Point) -> Point {
        self.transform[idx as usize] * (point - self.origin[idx as usize])
    }

    fn screen_to_layer_at(&self, idx: u32, point: Point) -> Option<Point> {
        let parent = self.parent[idx as usize];
        let p = if parent == INVALID {
            point
        } else {
            self.screen_to_layer_at(parent, point)?
        };
        self.parent_to_layer_at(idx, p)
    }
}
