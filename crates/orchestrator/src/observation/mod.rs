#![forbid(unsafe_code)]

mod event;
mod parse;
mod procfs_scanner;

pub use event::{ReadFailure, ScanWarning};
pub use parse::{parse_cgroup, parse_cmdline, parse_maps, stale_path};
pub use procfs_scanner::ProcfsScanner;

use crate::domain::Process;
use crate::error::Error;

pub trait Scanner: Send + Sync {
    /// Enumerate and inspect every live process once.
    fn scan(&mut self) -> Result<Scan, Error>;
}

/// Result of one pass over the process table.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub processes: Vec<Process>,
    pub warnings: Vec<ScanWarning>,
}
