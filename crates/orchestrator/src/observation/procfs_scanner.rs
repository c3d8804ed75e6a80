#![forbid(unsafe_code)]

use crate::domain::Process;
use crate::error::Error;
use crate::observation::{
    ReadFailure, Scan, ScanWarning, Scanner, parse_cgroup, parse_cmdline, parse_maps,
};
use config::Config;
use std::path::PathBuf;
use tracing::{debug, trace, warn};

/// Inspects processes through a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcfsScanner {
    procfs: PathBuf,
    roots: Vec<PathBuf>,
}

impl ProcfsScanner {
    pub fn new(config: &Config) -> Self {
        Self::with_root(config.scan.procfs.clone(), config.scan.roots.clone())
    }

    pub fn with_root(procfs: impl Into<PathBuf>, roots: Vec<PathBuf>) -> Self {
        Self {
            procfs: procfs.into(),
            roots,
        }
    }

    /// Inspect a single process.
    ///
    /// Never fails: unreadable files leave their field empty and are reported
    /// through `warnings`. Returns `None` only when the process has exited,
    /// in which case it must not be considered any further.
    pub fn inspect(&self, pid: i32, warnings: &mut Vec<ScanWarning>) -> Option<Process> {
        let dir = self.procfs.join(pid.to_string());
        if let Err(err) = procfs::process::Process::new_with_root(dir) {
            let failure = ReadFailure::from(err);
            let vanished = failure == ReadFailure::Vanished;
            note(pid, "pid directory", failure, warnings);
            if vanished {
                return None;
            }
        }
        self.inspect_pid(pid, warnings)
    }

    fn inspect_pid(&self, pid: i32, warnings: &mut Vec<ScanWarning>) -> Option<Process> {
        let mut inspected = Process::new(pid);

        match self.read(pid, "maps") {
            Ok(raw) => inspected.stale_maps = parse_maps(&raw, &self.roots),
            Err(ReadFailure::Vanished) => {
                note(pid, "maps", ReadFailure::Vanished, warnings);
                return None;
            }
            Err(failure) => note(pid, "maps", failure, warnings),
        }

        match self.read(pid, "cmdline") {
            Ok(raw) => inspected.cmdline = parse_cmdline(&raw),
            Err(ReadFailure::Vanished) => {
                note(pid, "cmdline", ReadFailure::Vanished, warnings);
                return None;
            }
            Err(failure) => note(pid, "cmdline", failure, warnings),
        }

        match self.read(pid, "cgroup") {
            Ok(raw) => inspected.unit = parse_cgroup(&String::from_utf8_lossy(&raw)),
            Err(ReadFailure::Vanished) => {
                note(pid, "cgroup", ReadFailure::Vanished, warnings);
                return None;
            }
            Err(failure) => note(pid, "cgroup", failure, warnings),
        }

        trace!(
            pid,
            unit = ?inspected.unit,
            stale = inspected.stale_maps.len(),
            "process inspected"
        );
        Some(inspected)
    }

    fn read(&self, pid: i32, file: &str) -> Result<Vec<u8>, ReadFailure> {
        let path = self.procfs.join(pid.to_string()).join(file);
        Ok(std::fs::read(path)?)
    }
}

fn note(pid: i32, file: &'static str, failure: ReadFailure, warnings: &mut Vec<ScanWarning>) {
    match &failure {
        ReadFailure::Vanished => debug!(pid, file, "process went away"),
        ReadFailure::PermissionDenied => debug!(pid, file, "permission denied"),
        ReadFailure::Other(reason) => warn!(pid, file, %reason, "failed to read process file"),
    }
    warnings.push(ScanWarning::ReadFailed { pid, file, failure });
}

impl Scanner for ProcfsScanner {
    fn scan(&mut self) -> Result<Scan, Error> {
        let mut scan = Scan::default();

        for process in procfs::process::all_processes_with_root(&self.procfs)? {
            let process = match process {
                Ok(p) => p,
                Err(err) => {
                    let failure = ReadFailure::from(err);
                    if failure != ReadFailure::Vanished {
                        warn!(%failure, "failed to read process entry");
                        scan.warnings.push(ScanWarning::EntryFailed {
                            reason: failure.to_string(),
                        });
                    }
                    continue;
                }
            };
            if let Some(inspected) = self.inspect_pid(process.pid, &mut scan.warnings) {
                scan.processes.push(inspected);
            }
        }

        debug!(
            processes = scan.processes.len(),
            warnings = scan.warnings.len(),
            "scan finished"
        );
        Ok(scan)
    }
}
