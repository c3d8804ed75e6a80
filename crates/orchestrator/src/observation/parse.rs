#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

const DELETED_MARKER: &[u8] = b" (deleted)";

/// Fields preceding the pathname: address, perms, offset, dev, inode.
const MAPS_FIELDS: usize = 5;

/// Controller field the service manager uses on cgroup v1 hierarchies.
const SYSTEMD_CONTROLLER: &str = "name=systemd";

const UNIT_SUFFIXES: &[&str] = &[".service", ".scope", ".socket", ".mount", ".swap"];

/// Turn a mapping's backing pathname into stale evidence.
///
/// Returns the path with the kernel's ` (deleted)` marker stripped, but only
/// when the marker is present and the path lies below one of `roots`.
///
/// # Examples
///
/// ```
/// # use orchestrator::observation::stale_path;
/// # use std::path::{Path, PathBuf};
/// let roots = [PathBuf::from("/usr"), PathBuf::from("/opt")];
///
/// let path = Path::new("/usr/lib/libfoo.so.1 (deleted)");
/// assert_eq!(stale_path(path, &roots), Some(PathBuf::from("/usr/lib/libfoo.so.1")));
///
/// // still on disk
/// assert_eq!(stale_path(Path::new("/usr/lib/libfoo.so.1"), &roots), None);
/// // deleted, but not installed software
/// assert_eq!(stale_path(Path::new("/tmp/scratch (deleted)"), &roots), None);
/// ```
pub fn stale_path(pathname: &Path, roots: &[PathBuf]) -> Option<PathBuf> {
    let stripped = pathname.as_os_str().as_bytes().strip_suffix(DELETED_MARKER)?;
    let path = Path::new(OsStr::from_bytes(stripped));
    if !path.has_root() {
        return None;
    }
    roots
        .iter()
        .any(|root| path.starts_with(root))
        .then(|| path.to_path_buf())
}

/// Collect the stale evidence of a raw `maps` file.
///
/// Pathnames are taken as raw bytes since the kernel only escapes newlines.
/// A line that does not have the shape of a mapping is skipped on its own.
pub fn parse_maps(raw: &[u8], roots: &[PathBuf]) -> BTreeSet<PathBuf> {
    raw.split(|&b| b == b'\n')
        .filter_map(map_pathname)
        .filter_map(|pathname| stale_path(Path::new(OsStr::from_bytes(pathname)), roots))
        .collect()
}

fn map_pathname(line: &[u8]) -> Option<&[u8]> {
    let mut rest = line;
    for _ in 0..MAPS_FIELDS {
        rest = rest.trim_ascii_start();
        let end = rest.iter().position(u8::is_ascii_whitespace)?;
        rest = &rest[end..];
    }
    let pathname = rest.trim_ascii_start();
    (!pathname.is_empty()).then_some(pathname)
}

/// Turn a raw `cmdline` buffer into an identity string.
///
/// Arguments are NUL separated; they are joined with spaces and only the
/// first line is kept. Kernel threads and zombies have an empty buffer.
pub fn parse_cmdline(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let joined = text.trim_end_matches('\0').replace('\0', " ");
    let first = joined.lines().next()?.trim_end();
    if first.is_empty() {
        None
    } else {
        Some(first.to_owned())
    }
}

/// Find the owning unit in the contents of a `cgroup` file.
///
/// Each line reads `hierarchy-ID:controller-list:path`. A cgroup v1 line for
/// the `name=systemd` hierarchy wins; otherwise the unified (v2) line is used
/// when its last segment is named like a unit. The unit is the last path
/// segment either way.
pub fn parse_cgroup(content: &str) -> Option<String> {
    let mut unified = None;

    for line in content.lines() {
        let mut parts = line.splitn(3, ':');
        let (Some(hierarchy), Some(controllers), Some(path)) =
            (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let Some(segment) = last_segment(path) else {
            continue;
        };

        if controllers.split(',').any(|c| c == SYSTEMD_CONTROLLER) {
            return Some(segment.to_owned());
        }

        if hierarchy == "0" && controllers.is_empty() && is_unit_name(segment) {
            unified = Some(segment.to_owned());
        }
    }

    unified
}

fn last_segment(path: &str) -> Option<&str> {
    path.trim_end().rsplit('/').next().filter(|s| !s.is_empty())
}

fn is_unit_name(segment: &str) -> bool {
    UNIT_SUFFIXES
        .iter()
        .any(|suffix| segment.len() > suffix.len() && segment.ends_with(suffix))
}
