// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-tested pointer dispatch over a transformable 2D layer tree.
//!
//! `tactile_core` turns raw platform mouse events into callbacks on scene
//! nodes ("layers"). It hit-tests against a tree of transformed layers,
//! re-expresses the pointer position in each target's local coordinate
//! space, and tracks which layer is pressed and which is hovered so that
//! drag, move, over, and out fall out of a plain stream of raw events. It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! Events flow from a platform backend through the dispatcher into the tree:
//!
//! ```text
//!   Backend (native events)
//!       │  ButtonEvent / MotionEvent / WheelEvent
//!       ▼
//!   Mouse::on_mouse_*() ──► MouseListener (global, raw)
//!       │
//!       ├──► LayerStore::hit_test(root, …) ──► active / hover layer
//!       │
//!       ▼
//!   event.localize(layer) ──► LayerStore::interact(layer, Capability, …)
//!       │
//!       ▼
//!   prevent-default flag ──► Backend
//! ```
//!
//! **[`mouse`]**: The [`Mouse`](mouse::Mouse) dispatcher and the global
//! [`MouseListener`](mouse::MouseListener) trait.
//!
//! **[`layer`]**: Struct-of-arrays layer tree with generational handles,
//! hit testing, coordinate conversion, and per-layer listener registries
//! keyed by [`Capability`](layer::Capability).
//!
//! **[`event`]**: Button, motion, and wheel events with localization and the
//! prevent-default flag.
//!
//! **[`backend`]**: The contract platform backends follow, including the
//! [`PointerLock`](backend::PointerLock) trait.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! dispatch instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use tactile_core::event::{ButtonEvent, MouseButton};
//! use tactile_core::layer::{LayerStore, Listener};
//! use tactile_core::mouse::Mouse;
//!
//! let mut store = LayerStore::new();
//! let root = store.create_layer();
//! let button = store.create_layer();
//! store.add_child(root, button);
//! store.set_hit_shape(button, Some(Rect::new(0.0, 0.0, 80.0, 24.0).into()));
//! let _ = store.add_listener(
//!     button,
//!     Listener::mouse_down(|_, event| event.set_prevent_default(true)),
//! );
//!
//! let mut mouse = Mouse::new(root);
//! let mut event = ButtonEvent::new(0.0, Point::new(10.0, 10.0), MouseButton::Left);
//! assert!(mouse.on_mouse_down(&mut store, &mut event));
//! assert_eq!(mouse.active_layer(), Some(button));
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod event;
pub mod layer;
pub mod mouse;
pub mod trace;
