use clap::Parser;
use std::path::{Path, PathBuf};

/// pmr: restart services that still run deleted code
///
/// pmr finds processes that map shared libraries or binaries which were
/// deleted from disk, usually by a package upgrade, groups them by their
/// service manager unit and restarts the units selected by the configured
/// strategy, one at a time.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    ///
    /// If not provided, the default locations are checked. They are
    /// `/etc/pmr/config.toml` and `/etc/pmr/config.d/*.toml`, where the
    /// latter being a glob pattern. If they don't exist, the default
    /// configuration is used.
    #[arg(short, long, value_parser = validate_file)]
    pub config: Option<PathBuf>,

    /// Decide and report, but do not restart anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show every unit and command line, including those without stale
    /// files, and log progress.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.is_file() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn existing_file_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert_eq!(validate_file(path.to_str().unwrap()), Ok(path));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(validate_file(dir.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from(["pmr", "-n", "--verbose"]).unwrap();
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["pmr"]).unwrap();
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(Cli::try_parse_from(["pmr", "--force"]).is_err());
    }

    proptest! {
        #[test]
        fn missing_files_are_rejected(name in "[a-z]{1,12}") {
            let dir = tempdir().unwrap();
            let path = dir.path().join(&name);
            let err = validate_file(path.to_str().unwrap()).unwrap_err();
            prop_assert_eq!(err, format!("File not found: {:?}", path));
        }
    }
}
