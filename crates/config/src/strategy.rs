use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::serde_as;
use std::fmt;

/// What happens to a name matched by a rule's pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Include,
    Exclude,
}

impl Effect {
    pub fn is_include(self) -> bool {
        matches!(self, Effect::Include)
    }
}

impl From<bool> for Effect {
    fn from(include: bool) -> Self {
        if include {
            Effect::Include
        } else {
            Effect::Exclude
        }
    }
}

impl Serialize for Effect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_include())
    }
}

/// Accepts a TOML boolean, or a string where only `"true"` includes.
impl<'de> Deserialize<'de> for Effect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EffectVisitor;

        impl Visitor<'_> for EffectVisitor {
            type Value = Effect;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a boolean or a \"true\"/\"false\" string")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Effect, E> {
                Ok(Effect::from(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Effect, E> {
                Ok(Effect::from(v == "true"))
            }
        }

        deserializer.deserialize_any(EffectVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Shell-style glob: `*` is any run of characters, `?` one character.
    pub pattern: String,
    pub effect: Effect,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, effect: impl Into<Effect>) -> Self {
        Self {
            pattern: pattern.into(),
            effect: effect.into(),
        }
    }
}

/// Pattern rules for one kind of name, in the order they were written.
///
/// The order is kept for display and round-tripping only. Evaluation is
/// order independent: any matching exclude rule vetoes, otherwise at least
/// one include rule has to match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RuleTable", into = "RuleTable")]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

impl FromIterator<(String, Effect)> for RuleSet {
    fn from_iter<T: IntoIterator<Item = (String, Effect)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(p, e)| Rule::new(p, e)))
    }
}

#[serde_as]
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct RuleTable(#[serde_as(as = "serde_with::Map<_, _>")] Vec<(String, Effect)>);

impl From<RuleTable> for RuleSet {
    fn from(table: RuleTable) -> Self {
        table.0.into_iter().collect()
    }
}

impl From<RuleSet> for RuleTable {
    fn from(set: RuleSet) -> Self {
        RuleTable(
            set.rules
                .into_iter()
                .map(|rule| (rule.pattern, rule.effect))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Strategy {
    /// Rules applied to unit names. Defaults to `"*.service" = true`.
    pub units: RuleSet,

    /// Rules applied to command lines of processes. Defaults to `"*" = true`.
    ///
    /// Command lines are never restarted; matches are only reported.
    pub cmdlines: RuleSet,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            units: RuleSet::new([Rule::new("*.service", Effect::Include)]),
            cmdlines: RuleSet::new([Rule::new("*", Effect::Include)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(default)]
        strategy: Strategy,
    }

    fn parse(text: &str) -> Strategy {
        toml_edit::de::from_str::<Wrapper>(text).unwrap().strategy
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        assert_eq!(parse(""), Strategy::default());
        let strategy = parse("[strategy.units]\n\"nginx*\" = true\n");
        assert_eq!(strategy.cmdlines, Strategy::default().cmdlines);
        assert_eq!(strategy.units.rules(), &[Rule::new("nginx*", true)]);
    }

    #[test]
    fn empty_section_is_an_empty_rule_set() {
        let strategy = parse("[strategy.units]\n");
        assert!(strategy.units.is_empty());
    }

    #[test]
    fn string_effects_only_include_on_true() {
        let strategy = parse(
            "[strategy.units]\n\
             \"a*\" = \"true\"\n\
             \"b*\" = \"yes\"\n\
             \"c*\" = \"false\"\n\
             \"d*\" = false\n",
        );
        let effects: Vec<_> = strategy.units.iter().map(|r| r.effect).collect();
        assert_eq!(
            effects,
            [
                Effect::Include,
                Effect::Exclude,
                Effect::Exclude,
                Effect::Exclude
            ]
        );
    }

    #[test]
    fn rules_keep_file_order() {
        let strategy = parse(
            "[strategy.units]\n\
             \"z.service\" = false\n\
             \"*.service\" = true\n\
             \"a.service\" = false\n",
        );
        let patterns: Vec<_> = strategy.units.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, ["z.service", "*.service", "a.service"]);
    }

    #[test]
    fn non_boolean_effect_is_rejected() {
        let result = toml_edit::de::from_str::<Wrapper>("[strategy.units]\n\"a\" = 1\n");
        assert!(result.is_err());
    }
}
