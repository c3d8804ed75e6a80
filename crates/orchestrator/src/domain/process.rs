#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;

/// One process as seen during a single scan.
///
/// All fields are filled in once, when the process is inspected. Pids are
/// reused by the kernel, so a `Process` means nothing outside the scan that
/// produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Process {
    pub pid: i32,
    /// Deleted files below an installed-software root that are still mapped
    /// into the address space, with the ` (deleted)` marker stripped.
    pub stale_maps: BTreeSet<PathBuf>,
    /// First line of the invocation, arguments joined by spaces.
    pub cmdline: Option<String>,
    /// Owning service manager unit, from control group membership.
    pub unit: Option<String>,
}

impl Process {
    pub fn new(pid: i32) -> Self {
        Self {
            pid,
            ..Self::default()
        }
    }

    pub fn with_stale_maps<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.stale_maps.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_cmdline(mut self, cmdline: impl Into<String>) -> Self {
        self.cmdline = Some(cmdline.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}
