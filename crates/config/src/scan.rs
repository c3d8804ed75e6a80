use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Scan {
    /// Root of the process-information pseudo-filesystem. Every numeric
    /// directory below it is treated as one live process.
    ///
    /// # Note
    ///
    /// Only useful to change when inspecting a host from inside a container
    /// that bind-mounts the host's `/proc` somewhere else.
    pub procfs: PathBuf,

    /// Installed-software roots. A deleted file mapped into a process only
    /// counts as stale evidence when its path lies below one of these
    /// prefixes. Matching is done per path component, so `/usr` matches
    /// `/usr/lib/libc.so.6` but not `/usrlocal/foo`.
    ///
    /// Keep this list short: temp files, shared memory segments and
    /// memfd-backed mappings also show up as deleted, and none of them
    /// mean a service runs outdated code.
    pub roots: Vec<PathBuf>,
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            procfs: PathBuf::from("/proc"),
            roots: vec![PathBuf::from("/usr"), PathBuf::from("/opt")],
        }
    }
}
