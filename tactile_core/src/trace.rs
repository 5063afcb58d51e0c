// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for pointer dispatch.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Mouse`](crate::mouse::Mouse) dispatcher calls at each stage of handling a
//! raw event. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! A handler produces, in order: one [`InputEvent`], at most one
//! [`HitTestEvent`], any [`SessionEvent`]s and [`LayerDispatchEvent`]s as they
//! happen, and finally one [`DispatchSummary`]. A disabled dispatcher emits
//! nothing.

use kurbo::Point;

use crate::layer::{Capability, LayerId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which dispatcher entry point handled a raw event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// [`Mouse::on_mouse_down`](crate::mouse::Mouse::on_mouse_down).
    MouseDown,
    /// [`Mouse::on_mouse_up`](crate::mouse::Mouse::on_mouse_up).
    MouseUp,
    /// [`Mouse::on_mouse_move`](crate::mouse::Mouse::on_mouse_move).
    MouseMove,
    /// [`Mouse::on_mouse_wheel_scroll`](crate::mouse::Mouse::on_mouse_wheel_scroll).
    MouseWheel,
}

/// Which piece of dispatcher session state changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionSlot {
    /// The layer pressed by the current button gesture.
    Active,
    /// The layer under the pointer.
    Hover,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when an enabled dispatcher accepts a raw event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    /// Event timestamp in milliseconds.
    pub time: f64,
    /// Which handler received the event.
    pub kind: InputKind,
    /// Device-space position.
    pub position: Point,
}

/// Emitted after the dispatcher hit-tests the root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTestEvent {
    /// Event timestamp in milliseconds.
    pub time: f64,
    /// The device position converted into root-local space, or `None` if the
    /// root transform is not invertible.
    pub root_point: Option<Point>,
    /// The deepest interactive layer under the point.
    pub hit: Option<LayerId>,
}

/// Emitted after listeners on one layer have been invoked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerDispatchEvent {
    /// Event timestamp in milliseconds.
    pub time: f64,
    /// The target layer.
    pub layer: LayerId,
    /// Which listener list was walked.
    pub capability: Capability,
    /// How many listeners were called.
    pub listeners: u32,
    /// The running prevent-default flag after this dispatch.
    pub prevent_default: bool,
}

/// Emitted when the active or hover layer changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionEvent {
    /// Event timestamp in milliseconds.
    pub time: f64,
    /// Which slot changed.
    pub slot: SessionSlot,
    /// Previous value.
    pub from: Option<LayerId>,
    /// New value.
    pub to: Option<LayerId>,
}

/// Emitted when a handler returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DispatchSummary {
    /// Event timestamp in milliseconds.
    pub time: f64,
    /// Which handler finished.
    pub kind: InputKind,
    /// The value the handler returned.
    pub prevent_default: bool,
    /// How many layer dispatches the handler performed.
    pub layer_dispatches: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the pointer dispatcher.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an enabled dispatcher accepts a raw event.
    fn on_input(&mut self, e: &InputEvent) {
        _ = e;
    }

    /// Called after the root is hit-tested.
    fn on_hit_test(&mut self, e: &HitTestEvent) {
        _ = e;
    }

    /// Called after a layer's listeners for one capability have run.
    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        _ = e;
    }

    /// Called when the active or hover layer changes.
    fn on_session_change(&mut self, e: &SessionEvent) {
        _ = e;
    }

    /// Called when a handler returns.
    fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`InputEvent`].
    #[inline]
    pub fn input(&mut self, e: &InputEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_input(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`HitTestEvent`].
    #[inline]
    pub fn hit_test(&mut self, e: &HitTestEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_hit_test(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerDispatchEvent`].
    #[inline]
    pub fn layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_dispatch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SessionEvent`].
    #[inline]
    pub fn session_change(&mut self, e: &SessionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_session_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchSummary`].
    #[inline]
    pub fn dispatch_summary(&mut self, s: &DispatchSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_dispatch_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
