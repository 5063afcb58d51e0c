// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw and localized pointer events.
//!
//! Platform backends construct [`ButtonEvent`], [`MotionEvent`], and
//! [`WheelEvent`] values in device (root/screen) coordinates and hand them to
//! the [`Mouse`](crate::mouse::Mouse) dispatcher. Before an event reaches a
//! layer's listeners it is *localized*: [`ButtonEvent::localize`] and
//! [`MotionEvent::localize`] return a copy that remembers the target layer and
//! carries the pointer position re-expressed in that layer's coordinate space.
//! The device position is preserved alongside.
//!
//! Every event carries a *prevent default* flag. Listeners set it to ask the
//! calling platform layer to suppress its default handling of the native
//! event (text selection, context menus, page scrolling). The flag never
//! stops dispatch itself.

use kurbo::{Point, Vec2};

use crate::layer::{LayerId, LayerStore};

/// Which mouse button a [`ButtonEvent`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The primary button.
    Left,
    /// The middle button (often the wheel).
    Middle,
    /// The secondary button.
    Right,
    /// The "back" side button.
    Back,
    /// The "forward" side button.
    Forward,
    /// Any other button, by platform-specific number.
    Other(u16),
}

/// State shared by every pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Input {
    time: f64,
    position: Point,
    local: Point,
    hit: Option<LayerId>,
    prevent_default: bool,
}

impl Input {
    fn new(time: f64, position: Point) -> Self {
        Self {
            time,
            position,
            local: position,
            hit: None,
            prevent_default: false,
        }
    }

    fn localize(&self, store: &LayerStore, layer: LayerId) -> Self {
        let local = store
            .screen_to_layer(layer, self.position)
            .unwrap_or(Point::new(f64::NAN, f64::NAN));
        Self {
            local,
            hit: Some(layer),
            ..*self
        }
    }
}

/// Implements the accessors every event type shares through its `input`
/// field.
macro_rules! input_accessors {
    ($ty:ident) => {
        impl $ty {
            /// Timestamp of the event in milliseconds, as reported by the
            /// platform.
            #[inline]
            #[must_use]
            pub fn time(&self) -> f64 {
                self.input.time
            }

            /// Device-space position of the pointer.
            #[inline]
            #[must_use]
            pub fn position(&self) -> Point {
                self.input.position
            }

            /// Device-space x coordinate.
            #[inline]
            #[must_use]
            pub fn x(&self) -> f64 {
                self.input.position.x
            }

            /// Device-space y coordinate.
            #[inline]
            #[must_use]
            pub fn y(&self) -> f64 {
                self.input.position.y
            }

            /// Position in the coordinate space of [`hit`](Self::hit).
            ///
            /// Equal to [`position`](Self::position) for events that have not
            /// been localized. If the hit layer's ancestry contains a
            /// non-invertible transform the coordinates are NaN.
            #[inline]
            #[must_use]
            pub fn local_position(&self) -> Point {
                self.input.local
            }

            /// Local x coordinate.
            #[inline]
            #[must_use]
            pub fn local_x(&self) -> f64 {
                self.input.local.x
            }

            /// Local y coordinate.
            #[inline]
            #[must_use]
            pub fn local_y(&self) -> f64 {
                self.input.local.y
            }

            /// The layer this event was localized to, if any.
            #[inline]
            #[must_use]
            pub fn hit(&self) -> Option<LayerId> {
                self.input.hit
            }

            /// Returns whether a listener asked to suppress the platform's
            /// default handling.
            #[inline]
            #[must_use]
            pub fn prevent_default(&self) -> bool {
                self.input.prevent_default
            }

            /// Sets the prevent-default flag.
            #[inline]
            pub fn set_prevent_default(&mut self, prevent: bool) {
                self.input.prevent_default = prevent;
            }
        }
    };
}

/// A mouse button was pressed or released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonEvent {
    input: Input,
    button: MouseButton,
}

impl ButtonEvent {
    /// Creates a raw button event at device position `position`.
    #[must_use]
    pub fn new(time: f64, position: Point, button: MouseButton) -> Self {
        Self {
            input: Input::new(time, position),
            button,
        }
    }

    /// The button that changed state.
    #[inline]
    #[must_use]
    pub fn button(&self) -> MouseButton {
        self.button
    }

    /// Returns a copy of this event localized to `layer`.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is stale.
    #[must_use]
    pub fn localize(&self, store: &LayerStore, layer: LayerId) -> Self {
        Self {
            input: self.input.localize(store, layer),
            button: self.button,
        }
    }
}

input_accessors!(ButtonEvent);

/// The pointer moved, with or without a button held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionEvent {
    input: Input,
    delta: Vec2,
}

impl MotionEvent {
    /// Creates a raw motion event at device position `position` with no
    /// reported delta.
    #[must_use]
    pub fn new(time: f64, position: Point) -> Self {
        Self::with_delta(time, position, Vec2::ZERO)
    }

    /// Creates a raw motion event carrying the device-space movement since
    /// the previous motion event.
    ///
    /// Backends with a locked pointer report movement only through the delta,
    /// since the position stops changing.
    #[must_use]
    pub fn with_delta(time: f64, position: Point, delta: Vec2) -> Self {
        Self {
            input: Input::new(time, position),
            delta,
        }
    }

    /// Device-space movement since the previous motion event.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Horizontal component of [`delta`](Self::delta).
    #[inline]
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.delta.x
    }

    /// Vertical component of [`delta`](Self::delta).
    #[inline]
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.delta.y
    }

    /// Returns a copy of this event localized to `layer`.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is stale.
    #[must_use]
    pub fn localize(&self, store: &LayerStore, layer: LayerId) -> Self {
        Self {
            input: self.input.localize(store, layer),
            delta: self.delta,
        }
    }
}

input_accessors!(MotionEvent);

/// The mouse wheel was scrolled.
///
/// Wheel events are delivered to layers as-is, without localization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    input: Input,
    velocity: f64,
}

impl WheelEvent {
    /// Creates a raw wheel event.
    ///
    /// Positive `velocity` scrolls down (away from the user).
    #[must_use]
    pub fn new(time: f64, position: Point, velocity: f64) -> Self {
        Self {
            input: Input::new(time, position),
            velocity,
        }
    }

    /// Scroll velocity; positive values scroll down.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

input_accessors!(WheelEvent);
