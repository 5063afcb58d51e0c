// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for tactile pointer
//! dispatch.
//!
//! This crate provides [`TraceSink`](tactile_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! Pass any of them to a dispatcher through
//! [`Tracer::new`](tactile_core::trace::Tracer::new) and the `*_traced`
//! handler variants on [`Mouse`](tactile_core::mouse::Mouse).

pub mod chrome;
pub mod pretty;
pub mod recorder;
