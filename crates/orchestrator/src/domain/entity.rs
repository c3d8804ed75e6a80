#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// A service manager unit. Restartable.
    Unit,
    /// A bare command line. Only ever reported.
    Cmdline,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Unit => f.write_str("unit"),
            EntityKind::Cmdline => f.write_str("cmdline"),
        }
    }
}

/// Something that may need a restart: a unit or a command line, together
/// with the stale files of every process attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    pub reasons: BTreeSet<PathBuf>,
}

impl Entity {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            reasons: BTreeSet::new(),
        }
    }

    pub fn unit(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Unit, name)
    }

    pub fn cmdline(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Cmdline, name)
    }

    /// Union `reasons` into this entity. Merging the same evidence again is
    /// a no-op.
    pub fn merge<'a, I>(&mut self, reasons: I)
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        self.reasons.extend(reasons.into_iter().cloned());
    }

    pub fn has_evidence(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn is_restartable(&self) -> bool {
        self.kind == EntityKind::Unit
    }
}
