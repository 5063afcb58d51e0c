// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Write errors
//! are ignored so that tracing never disturbs dispatch.

use std::io::Write;

use tactile_core::layer::LayerId;
use tactile_core::trace::{
    DispatchSummary, HitTestEvent, InputEvent, InputKind, LayerDispatchEvent, SessionEvent,
    SessionSlot, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub(crate) fn kind_name(kind: InputKind) -> &'static str {
    match kind {
        InputKind::MouseDown => "down",
        InputKind::MouseUp => "up",
        InputKind::MouseMove => "move",
        InputKind::MouseWheel => "wheel",
    }
}

fn slot_name(slot: SessionSlot) -> &'static str {
    match slot {
        SessionSlot::Active => "active",
        SessionSlot::Hover => "hover",
    }
}

/// Formats an optional layer as `L<index>g<generation>` or `-`.
fn layer(id: Option<LayerId>) -> String {
    match id {
        Some(id) => format!("L{}g{}", id.index(), id.generation()),
        None => "-".to_owned(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_input(&mut self, e: &InputEvent) {
        let _ = writeln!(
            self.writer,
            "[input] {} at ({:.1}, {:.1}) t={:.3}ms",
            kind_name(e.kind),
            e.position.x,
            e.position.y,
            e.time,
        );
    }

    fn on_hit_test(&mut self, e: &HitTestEvent) {
        let point = match e.root_point {
            Some(p) => format!("({:.1}, {:.1})", p.x, p.y),
            None => "singular".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[hit] root={point} hit={}",
            layer(e.hit),
        );
    }

    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[dispatch] {} -> {} listeners={} prevent={}",
            e.capability.name(),
            layer(Some(e.layer)),
            e.listeners,
            e.prevent_default,
        );
    }

    fn on_session_change(&mut self, e: &SessionEvent) {
        let _ = writeln!(
            self.writer,
            "[session] {} {} -> {}",
            slot_name(e.slot),
            layer(e.from),
            layer(e.to),
        );
    }

    fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] {} dispatches={} prevent={}",
            kind_name(s.kind),
            s.layer_dispatches,
            s.prevent_default,
        );
    }
}
