// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as tagged little-endian records. Floats are stored as their IEEE
//! bit patterns, so times and positions decode exactly. [`decode`] reads the
//! records back as an iterator of [`RecordedEvent`], stopping at the first
//! truncated or unrecognized record.

use kurbo::Point;

use tactile_core::layer::{Capability, LayerId};
use tactile_core::trace::{
    DispatchSummary, HitTestEvent, InputEvent, InputKind, LayerDispatchEvent, SessionEvent,
    SessionSlot, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_INPUT: u8 = 1;
const TAG_HIT_TEST: u8 = 2;
const TAG_LAYER_DISPATCH: u8 = 3;
const TAG_SESSION: u8 = 4;
const TAG_SUMMARY: u8 = 5;

fn kind_code(kind: InputKind) -> u8 {
    match kind {
        InputKind::MouseDown => 0,
        InputKind::MouseUp => 1,
        InputKind::MouseMove => 2,
        InputKind::MouseWheel => 3,
    }
}

fn kind_from_code(code: u8) -> Option<InputKind> {
    Some(match code {
        0 => InputKind::MouseDown,
        1 => InputKind::MouseUp,
        2 => InputKind::MouseMove,
        3 => InputKind::MouseWheel,
        _ => return None,
    })
}

fn capability_from_code(code: u8) -> Option<Capability> {
    Capability::ALL.get(usize::from(code)).copied()
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    fn write_layer(&mut self, id: LayerId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_option_point(&mut self, p: Option<Point>) {
        match p {
            Some(p) => {
                self.write_u8(1);
                self.write_point(p);
            }
            None => self.write_u8(0),
        }
    }

    fn write_option_layer(&mut self, id: Option<LayerId>) {
        match id {
            Some(id) => {
                self.write_u8(1);
                self.write_layer(id);
            }
            None => self.write_u8(0),
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_input(&mut self, e: &InputEvent) {
        self.write_u8(TAG_INPUT);
        self.write_f64(e.time);
        self.write_u8(kind_code(e.kind));
        self.write_point(e.position);
    }

    fn on_hit_test(&mut self, e: &HitTestEvent) {
        self.write_u8(TAG_HIT_TEST);
        self.write_f64(e.time);
        self.write_option_point(e.root_point);
        self.write_option_layer(e.hit);
    }

    fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
        self.write_u8(TAG_LAYER_DISPATCH);
        self.write_f64(e.time);
        self.write_layer(e.layer);
        self.write_u8(e.capability.code());
        self.write_u32(e.listeners);
        self.write_bool(e.prevent_default);
    }

    fn on_session_change(&mut self, e: &SessionEvent) {
        self.write_u8(TAG_SESSION);
        self.write_f64(e.time);
        self.write_u8(match e.slot {
            SessionSlot::Active => 0,
            SessionSlot::Hover => 1,
        });
        self.write_option_layer(e.from);
        self.write_option_layer(e.to);
    }

    fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
        self.write_u8(TAG_SUMMARY);
        self.write_f64(s.time);
        self.write_u8(kind_code(s.kind));
        self.write_bool(s.prevent_default);
        self.write_u32(s.layer_dispatches);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// An [`InputEvent`].
    Input(InputEvent),
    /// A [`HitTestEvent`].
    HitTest(HitTestEvent),
    /// A [`LayerDispatchEvent`].
    LayerDispatch(LayerDispatchEvent),
    /// A [`SessionEvent`].
    Session(SessionEvent),
    /// A [`DispatchSummary`].
    Summary(DispatchSummary),
}

impl RecordedEvent {
    /// Timestamp of the event in milliseconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        match self {
            Self::Input(e) => e.time,
            Self::HitTest(e) => e.time,
            Self::LayerDispatch(e) => e.time,
            Self::Session(e) => e.time,
            Self::Summary(s) => s.time,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        let [v] = self.take::<1>()?;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_bits(u64::from_le_bytes(self.take()?)))
    }

    fn read_point(&mut self) -> Option<Point> {
        Some(Point::new(self.read_f64()?, self.read_f64()?))
    }

    fn read_layer(&mut self) -> Option<LayerId> {
        Some(LayerId::from_raw_parts(self.read_u32()?, self.read_u32()?))
    }

    fn read_option_point(&mut self) -> Option<Option<Point>> {
        match self.read_u8()? {
            0 => Some(None),
            _ => Some(Some(self.read_point()?)),
        }
    }

    fn read_option_layer(&mut self) -> Option<Option<LayerId>> {
        match self.read_u8()? {
            0 => Some(None),
            _ => Some(Some(self.read_layer()?)),
        }
    }

    fn read_kind(&mut self) -> Option<InputKind> {
        kind_from_code(self.read_u8()?)
    }

    fn decode_input(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Input(InputEvent {
            time: self.read_f64()?,
            kind: self.read_kind()?,
            position: self.read_point()?,
        }))
    }

    fn decode_hit_test(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::HitTest(HitTestEvent {
            time: self.read_f64()?,
            root_point: self.read_option_point()?,
            hit: self.read_option_layer()?,
        }))
    }

    fn decode_layer_dispatch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayerDispatch(LayerDispatchEvent {
            time: self.read_f64()?,
            layer: self.read_layer()?,
            capability: capability_from_code(self.read_u8()?)?,
            listeners: self.read_u32()?,
            prevent_default: self.read_bool()?,
        }))
    }

    fn decode_session(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Session(SessionEvent {
            time: self.read_f64()?,
            slot: match self.read_u8()? {
                0 => SessionSlot::Active,
                1 => SessionSlot::Hover,
                _ => return None,
            },
            from: self.read_option_layer()?,
            to: self.read_option_layer()?,
        }))
    }

    fn decode_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Summary(DispatchSummary {
            time: self.read_f64()?,
            kind: self.read_kind()?,
            prevent_default: self.read_bool()?,
            layer_dispatches: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let event = match tag {
            TAG_INPUT => self.decode_input(),
            TAG_HIT_TEST => self.decode_hit_test(),
            TAG_LAYER_DISPATCH => self.decode_layer_dispatch(),
            TAG_SESSION => self.decode_session(),
            TAG_SUMMARY => self.decode_summary(),
            _ => None,
        };
        if event.is_none() {
            // Truncated or unknown record: nothing after it can be trusted.
            self.pos = self.data.len();
        }
        event
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
