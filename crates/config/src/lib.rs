#![forbid(unsafe_code)]

mod error;
mod restart;
mod scan;
mod strategy;

pub use error::Error;
pub use restart::Restart;
pub use scan::Scan;
pub use strategy::{Effect, Rule, RuleSet, Strategy};

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub scan: Scan,
    pub strategy: Strategy,
    pub restart: Restart,
}

impl Config {
    /// Load configuration from a TOML file. Missing fields are filled with defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml_edit::de::from_str(&text)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let toml = toml_edit::ser::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from multiple TOML files. Later files override
    /// earlier ones; files that do not exist are skipped.
    pub fn load_multiple<T, U>(paths: U) -> Result<Self, Error>
    where
        T: AsRef<Path>,
        U: IntoIterator<Item = T>,
    {
        let mut merged = toml_edit::DocumentMut::new();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            let text = std::fs::read_to_string(path)?;
            let doc: toml_edit::DocumentMut = text.parse()?;
            merge_document(&mut merged, doc);
        }
        let config: Config = toml_edit::de::from_str(&merged.to_string())?;
        Ok(config)
    }
}

fn merge_document(target: &mut toml_edit::DocumentMut, source: toml_edit::DocumentMut) {
    for (key, item) in source.iter() {
        merge_item(
            target.entry(key).or_insert(toml_edit::Item::None),
            item.clone(),
        );
    }
}

fn merge_item(target: &mut toml_edit::Item, source: toml_edit::Item) {
    use toml_edit::Item;
    match (target, source) {
        (Item::Table(target_table), Item::Table(source_table)) => {
            for (key, item) in source_table.iter() {
                merge_item(target_table.entry(key).or_insert(Item::None), item.clone());
            }
        }
        (target_item, source_item) => {
            *target_item = source_item;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.strategy.units = RuleSet::new([
            Rule::new("*.service", true),
            Rule::new("sshd.service", false),
        ]);
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn empty_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn load_multiple_merges() {
        let dir = tempdir().unwrap();
        let path1 = dir.path().join("a.toml");
        let path2 = dir.path().join("b.toml");
        let missing = dir.path().join("missing.toml");

        std::fs::write(
            &path1,
            "[scan]\nroots = [\"/usr\"]\n[restart]\ndelay = 1\n[strategy.units]\n\"a*\" = true\n",
        )
        .unwrap();
        std::fs::write(&path2, "[restart]\ndelay = 9\n[strategy.units]\n\"b*\" = false\n").unwrap();

        let cfg = Config::load_multiple([missing, path1, path2]).unwrap();
        assert_eq!(cfg.scan.roots, vec![PathBuf::from("/usr")]);
        assert_eq!(cfg.restart.delay, Duration::from_secs(9));
        assert_eq!(
            cfg.strategy.units.rules(),
            &[Rule::new("a*", true), Rule::new("b*", false)]
        );
        assert_eq!(cfg.strategy.cmdlines, Strategy::default().cmdlines);
    }

    #[test]
    fn load_multiple_without_files_is_default() {
        let dir = tempdir().unwrap();
        let cfg = Config::load_multiple([dir.path().join("nope.toml")]).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
