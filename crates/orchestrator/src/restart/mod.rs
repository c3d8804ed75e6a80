#![forbid(unsafe_code)]

mod orchestrator;
mod restarter;

pub use orchestrator::{Mode, RestartOrchestrator, RestartOutcome, RestartReport, RestartStatus};
pub use restarter::{CommandRestarter, RestartOutput, Restarter};
