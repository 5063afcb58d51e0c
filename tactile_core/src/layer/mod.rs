// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in a transformable 2D scene tree. Each layer has:
//!
//! - An identity ([`LayerId`]): a generational handle that becomes stale when
//!   the layer is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//!   Later children are drawn above earlier ones and are hit-tested first.
//! - **Local properties** set by the caller:
//!   [`transform`](LayerStore::set_transform),
//!   [`origin`](LayerStore::set_origin),
//!   [`hit shape`](LayerStore::set_hit_shape), and
//!   [`flags`](LayerStore::set_flags) (`interactive`, `hidden`).
//! - **Listeners**: callbacks registered per [`Capability`] with
//!   [`add_listener`](LayerStore::add_listener) and invoked through
//!   [`interact`](LayerStore::interact).
//!
//! Layers are stored in struct-of-arrays layout with index-based handles.
//! Geometry queries ([`hit_test`](LayerStore::hit_test),
//! [`screen_to_layer`](LayerStore::screen_to_layer), and friends) read the
//! current local properties directly, so they always reflect mutations made
//! by listeners in the middle of a dispatch.

mod clip;
mod hit;
mod id;
mod listener;
mod store;
mod traverse;

pub use clip::HitShape;
pub use id::{INVALID, LayerId};
pub use listener::{
    ButtonHandler, Capability, Listener, ListenerKey, MotionHandler, WheelHandler,
};
pub use store::{LayerFlags, LayerStore};
pub use traverse::Children;
