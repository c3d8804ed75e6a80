#![forbid(unsafe_code)]

pub mod domain;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod observation;
pub mod plan;
pub mod restart;
pub mod strategy;

pub use engine::{Engine, RunReport, Services};
pub use error::Error;
pub use inventory::Inventory;
pub use observation::{ProcfsScanner, ReadFailure, Scan, ScanWarning, Scanner};
pub use plan::{Decision, Plan, Verdict};
pub use restart::{
    CommandRestarter, Mode, RestartOrchestrator, RestartOutcome, RestartOutput, RestartReport,
    RestartStatus, Restarter,
};
pub use strategy::{RuleMatcher, Strategy};

pub use domain::{Entity, EntityKind, Process};
