//! Recording adapters that capture interactions to cassettes.
//!
//! Plain return values are stored as-is. Fallible calls use the same
//! `{"ok": value}` / `{"err": message}` shape that
//! `replaying::extract_result` reads back.

pub mod filesystem;
pub mod git;

pub use filesystem::RecordingFileSystem;
pub use git::RecordingGitRepo;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cassette::recorder::CassetteRecorder;

fn to_value<T: Serialize>(value: &T) -> Value {
    // Port inputs and outputs are strings, paths and bools.
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "unserializable": e.to_string() }))
}

fn push(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: Value,
    output: Value,
) {
    let mut guard = recorder.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.record(port, method, input, output);
}

/// Record a call whose return value cannot fail.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    push(recorder, port, method, to_value(input), to_value(output));
}

/// Record a fallible call as `{"ok": v}` or `{"err": message}`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => json!({ "ok": to_value(v) }),
        Err(e) => json!({ "err": e.to_string() }),
    };
    push(recorder, port, method, to_value(input), output);
}
