// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Tactile splits platform-specific work into *backend* code that sits in
//! front of the [`Mouse`](crate::mouse::Mouse) dispatcher. Each backend
//! provides the following pieces:
//!
//! - **Event source**: translates native button, motion, and wheel
//!   notifications into [`ButtonEvent`], [`MotionEvent`], and [`WheelEvent`]
//!   values in device coordinates, and feeds them to the dispatcher one at a
//!   time on the thread that owns the [`LayerStore`](crate::layer::LayerStore).
//!   This is not abstracted by a trait because native event plumbing differs
//!   fundamentally across platforms.
//!
//! - **Default suppression**: every dispatcher handler returns the final
//!   prevent-default flag. The backend uses it to suppress the platform's own
//!   handling of the native event (for example `preventDefault()` on the
//!   web).
//!
//! - **Pointer lock**: implements the [`PointerLock`] trait if the platform
//!   can capture the pointer. Backends without support use [`Unsupported`].
//!
//! # Event loop pseudocode
//!
//! ```rust,ignore
//! fn on_native_mouse_down(native: NativeMouseEvent) {
//!     let mut event = ButtonEvent::new(native.time(), native.position(), native.button());
//!     if mouse.on_mouse_down(&mut store, &mut event) {
//!         native.prevent_default();
//!     }
//! }
//! ```
//!
//! [`ButtonEvent`]: crate::event::ButtonEvent
//! [`MotionEvent`]: crate::event::MotionEvent
//! [`WheelEvent`]: crate::event::WheelEvent

/// Pointer capture, as offered by a platform backend.
///
/// All methods default to "unsupported": locking does nothing and the pointer
/// is never reported as locked. While the pointer is locked, backends keep
/// reporting a fixed position and deliver movement through
/// [`MotionEvent::delta`](crate::event::MotionEvent::delta).
pub trait PointerLock {
    /// Requests that the pointer be locked to the surface.
    fn lock(&mut self) {}

    /// Releases a pointer lock.
    fn unlock(&mut self) {}

    /// Returns whether the pointer is currently locked.
    fn is_locked(&self) -> bool {
        false
    }

    /// Returns whether this backend can lock the pointer at all.
    fn is_lock_supported(&self) -> bool {
        false
    }
}

/// A [`PointerLock`] for platforms without pointer capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unsupported;

impl PointerLock for Unsupported {}
