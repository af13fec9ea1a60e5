//! scintsim-io: Trace replay and hit output for scintsim.
//!
//! This crate provides memory-mapped reading of recorded step traces,
//! writers handing per-event hits to disk, and JSON configuration loading.
//!

pub mod config;
mod error;
mod reader;
pub mod replay;
mod writer;

pub use config::{load_config, parse_config};
pub use error::{Error, Result};
pub use reader::{MappedFileReader, StepTraceReader};
pub use replay::{replay_trace, replay_trace_parallel};
pub use writer::HitFileWriter;
