//! Cassette format for recording and replaying port interactions.
//!
//! A run started with `TARGETSCOPE_RECORD=<dir>` captures every filesystem and
//! git call into per-port YAML cassettes; `TARGETSCOPE_REPLAY=<dir>` serves a
//! later run from them, which reproduces a CI resolution offline.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
