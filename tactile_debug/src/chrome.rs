// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each handler invocation becomes a duration slice (`B`/`E` pair, opened by
//! the input event and closed by the dispatch summary). Hit tests, session
//! changes, and layer dispatches become thread-scoped instant events inside
//! that slice.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use tactile_core::layer::LayerId;

use crate::pretty::kind_name;
use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Event times are recorded in milliseconds and written as microseconds.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        let ts = ms_to_us(recorded.time());
        match recorded {
            RecordedEvent::Input(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": kind_name(e.kind),
                    "cat": "Input",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "x": e.position.x,
                        "y": e.position.y,
                    }
                }));
            }
            RecordedEvent::HitTest(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "HitTest",
                    "cat": "HitTest",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "root_point": e.root_point.map(|p| [p.x, p.y]),
                        "hit": layer(e.hit),
                    }
                }));
            }
            RecordedEvent::LayerDispatch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": e.capability.name(),
                    "cat": "Layer",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "layer": layer(Some(e.layer)),
                        "listeners": e.listeners,
                        "prevent_default": e.prevent_default,
                    }
                }));
            }
            RecordedEvent::Session(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.slot),
                    "cat": "Session",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "from": layer(e.from),
                        "to": layer(e.to),
                    }
                }));
            }
            RecordedEvent::Summary(s) => {
                events.push(json!({
                    "ph": "E",
                    "name": kind_name(s.kind),
                    "cat": "Input",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "prevent_default": s.prevent_default,
                        "layer_dispatches": s.layer_dispatches,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ms_to_us(ms: f64) -> f64 {
    ms * 1000.0
}

/// Encodes a layer handle as `[index, generation]`, or `null`.
fn layer(id: Option<LayerId>) -> Value {
    match id {
        Some(id) => json!([id.index(), id.generation()]),
        None => Value::Null,
    }
}
