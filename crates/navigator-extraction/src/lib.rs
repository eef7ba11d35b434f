//! Navigator extraction workflows
//!
//! The HDFS and Hive programs: run a fixed set of catalog queries, report the
//! first result of each, tag one sample entity and hand back a marker for the
//! next incremental run.

#![forbid(unsafe_code)]

pub mod cli;
pub mod consumer;
pub mod marker_file;
pub mod report;
pub mod updater;
pub mod workflow;

pub use consumer::consume_first;
pub use marker_file::{read_marker, write_marker};
pub use report::{describe_record, ConsoleReporter, MemoryReporter, Reporter, NO_ELEMENTS_FOUND};
pub use updater::{build_entity, EntityUpdater, TagUpdate, TargetKind};
pub use workflow::{run_hdfs, run_hive, RunOutcome};
