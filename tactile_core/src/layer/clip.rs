// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit shapes for layer picking.

use kurbo::{Point, Shape};

/// The local-space region in which a layer reports itself as hit.
///
/// A layer without a hit shape is only ever reached through its children,
/// the way a pure grouping node behaves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitShape {
    /// An axis-aligned rectangle.
    Rect(kurbo::Rect),
    /// A rectangle with rounded corners.
    RoundedRect(kurbo::RoundedRect),
}

impl HitShape {
    /// Returns whether `point`, in the layer's local coordinates, lies inside
    /// this shape.
    ///
    /// Rectangles are half-open: the left and top edges are inside, the right
    /// and bottom edges are not.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        match self {
            Self::Rect(rect) => rect.contains(point),
            Self::RoundedRect(rrect) => {
                let rect = rrect.rect();
                rect.contains(point) && rrect.contains(point)
            }
        }
    }
}

impl From<kurbo::Rect> for HitShape {
    fn from(rect: kurbo::Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<kurbo::RoundedRect> for HitShape {
    fn from(rrect: kurbo::RoundedRect) -> Self {
        Self::RoundedRect(rrect)
    }
}
