#![forbid(unsafe_code)]

use crate::domain::{Entity, EntityKind};
use crate::error::Error;
use config::{Effect, RuleSet};
use glob::Pattern;

/// Compiled rules for one kind of name.
///
/// A name is selected when at least one include rule matches it and no
/// exclude rule does. Rule order never matters.
#[derive(Debug, Clone, Default)]
pub struct RuleMatcher {
    rules: Vec<(Pattern, Effect)>,
}

impl RuleMatcher {
    pub fn new(rules: &RuleSet) -> Result<Self, Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                Pattern::new(&rule.pattern)
                    .map(|pattern| (pattern, rule.effect))
                    .map_err(|source| Error::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    pub fn matches(&self, name: &str) -> bool {
        let mut included = false;
        for (pattern, effect) in &self.rules {
            if !pattern.matches(name) {
                continue;
            }
            match effect {
                Effect::Exclude => return false,
                Effect::Include => included = true,
            }
        }
        included
    }
}

/// Restart strategy: one matcher for unit names, one for command lines.
#[derive(Debug, Clone, Default)]
pub struct Strategy {
    units: RuleMatcher,
    cmdlines: RuleMatcher,
}

impl Strategy {
    pub fn new(config: &config::Strategy) -> Result<Self, Error> {
        Ok(Self {
            units: RuleMatcher::new(&config.units)?,
            cmdlines: RuleMatcher::new(&config.cmdlines)?,
        })
    }

    /// Whether the entity's name is selected by the rules for its kind.
    /// Evidence is not looked at here.
    pub fn selects(&self, entity: &Entity) -> bool {
        match entity.kind {
            EntityKind::Unit => self.units.matches(&entity.name),
            EntityKind::Cmdline => self.cmdlines.matches(&entity.name),
        }
    }
}
