//! Pipeline components: context, walk loop, worker pool, collectors.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;
pub mod workers;

pub use context::{
    CancelToken, Interrupted, PipelineChannels, PipelineHandles, WalkContext, WorkerContext,
    create_pipeline_channels, recv_or_cancel, send_or_cancel,
};
pub use error_handler::report_scan_problems;
pub use orchestrator::{
    collect_records, collect_records_with, resolve_workers, run_pipeline,
    shutdown_pipeline_handles, stream_records,
};
pub use walk::{WalkOutcome, run_walk_loop, spawn_walk_thread, to_outcome_walkdir};
pub use workers::spawn_workers;
