#![forbid(unsafe_code)]

use nix::errno::Errno;
use std::fmt;
use std::io;

/// Why a per-process pseudo-file could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadFailure {
    /// The process exited between enumeration and inspection.
    Vanished,
    /// Expected when not running as root.
    PermissionDenied,
    Other(String),
}

impl From<io::Error> for ReadFailure {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ReadFailure::Vanished,
            io::ErrorKind::PermissionDenied => ReadFailure::PermissionDenied,
            // the task is gone but its directory was still open
            _ if err.raw_os_error() == Some(Errno::ESRCH as i32) => ReadFailure::Vanished,
            _ => ReadFailure::Other(err.to_string()),
        }
    }
}

impl From<procfs::ProcError> for ReadFailure {
    fn from(err: procfs::ProcError) -> Self {
        match err {
            procfs::ProcError::NotFound(_) => ReadFailure::Vanished,
            procfs::ProcError::PermissionDenied(_) => ReadFailure::PermissionDenied,
            procfs::ProcError::Io(err, _) => err.into(),
            err => ReadFailure::Other(err.to_string()),
        }
    }
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadFailure::Vanished => f.write_str("process went away"),
            ReadFailure::PermissionDenied => f.write_str("permission denied"),
            ReadFailure::Other(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// The process table itself returned a broken entry.
    EntryFailed { reason: String },
    /// A per-process file (`maps`, `cmdline`, `cgroup`) was unreadable.
    ReadFailed {
        pid: i32,
        file: &'static str,
        failure: ReadFailure,
    },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::EntryFailed { reason } => write!(f, "bad process entry: {reason}"),
            ScanWarning::ReadFailed { pid, file, failure } => {
                write!(f, "PID {pid}: cannot read {file}: {failure}")
            }
        }
    }
}
