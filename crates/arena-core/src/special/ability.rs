//! Special ability instances and lists of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::SpecialType;
use crate::error::ArenaError;

/// A (type, parameter) pair, e.g. `Poison 2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecialAbility {
    pub kind: SpecialType,
    pub param: i32,
}

impl SpecialAbility {
    pub const fn new(kind: SpecialType, param: i32) -> Self {
        Self { kind, param }
    }

    /// Ability with the type's default parameter
    pub const fn of(kind: SpecialType) -> Self {
        Self {
            kind,
            param: kind.default_param(),
        }
    }

    /// Parse a comma-separated list, keeping the names that were not
    /// recognized for diagnostics instead of failing the whole list.
    pub fn parse_list(text: &str) -> (Vec<SpecialAbility>, Vec<String>) {
        Self::parse_all(text.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    /// Parse each entry; unknown names are logged and returned separately
    pub fn parse_all<'a, I>(entries: I) -> (Vec<SpecialAbility>, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parsed = Vec::new();
        let mut unknown = Vec::new();
        for entry in entries {
            match entry.parse::<SpecialAbility>() {
                Ok(ability) => parsed.push(ability),
                Err(err) => {
                    warn!(entry, %err, "dropping unrecognized special ability");
                    unknown.push(entry.to_string());
                }
            }
        }
        (parsed, unknown)
    }
}

impl fmt::Display for SpecialAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param == 0 {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.param)
        }
    }
}

impl FromStr for SpecialAbility {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (name, param) = match text.rsplit_once(char::is_whitespace) {
            Some((name, param)) => {
                let param = param.trim_start_matches('(').trim_end_matches(')');
                match param.parse() {
                    Ok(value) => (name.trim(), Some(value)),
                    Err(_) => (text, None),
                }
            }
            None => (text, None),
        };
        // Multi-word names ("Fire Breath") map onto the catalog spelling
        let compact: String = name.split_whitespace().collect();
        let kind = compact
            .parse::<SpecialType>()
            .map_err(|_| ArenaError::UnknownSpecial(s.to_string()))?;
        Ok(match param {
            Some(param) => SpecialAbility::new(kind, param),
            None => SpecialAbility::of(kind),
        })
    }
}

/// An ordered list of special abilities
///
/// Used both for the static abilities of a definition and for the
/// conditions a combatant accumulates during a fight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialList {
    entries: Vec<SpecialAbility>,
}

impl SpecialList {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, ability: SpecialAbility) {
        self.entries.push(ability);
    }

    pub fn has(&self, kind: SpecialType) -> bool {
        self.entries.iter().any(|a| a.kind == kind)
    }

    pub fn get(&self, kind: SpecialType) -> Option<&SpecialAbility> {
        self.entries.iter().find(|a| a.kind == kind)
    }

    /// Parameter of the first matching ability, or 0
    pub fn param(&self, kind: SpecialType) -> i32 {
        self.get(kind).map(|a| a.param).unwrap_or(0)
    }

    pub fn remove(&mut self, kind: SpecialType) {
        self.entries.retain(|a| a.kind != kind);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecialAbility> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Any entry whose type is classified as disabling
    pub fn any_disabling(&self) -> bool {
        self.entries.iter().any(|a| a.kind.is_disabling())
    }
}

impl FromIterator<SpecialAbility> for SpecialList {
    fn from_iter<I: IntoIterator<Item = SpecialAbility>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SpecialList {
    type Item = &'a SpecialAbility;
    type IntoIter = std::slice::Iter<'a, SpecialAbility>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_param() {
        let a: SpecialAbility = "Poison 2".parse().unwrap();
        assert_eq!(a, SpecialAbility::new(SpecialType::Poison, 2));

        let a: SpecialAbility = "Magic Resistance (30)".parse().unwrap();
        assert_eq!(a, SpecialAbility::new(SpecialType::MagicResistance, 30));
    }

    #[test]
    fn test_parse_default_param() {
        let a: SpecialAbility = "Regeneration".parse().unwrap();
        assert_eq!(a.param, 3);
        let a: SpecialAbility = "fire breath".parse().unwrap();
        assert_eq!(a.kind, SpecialType::FireBreath);
    }

    #[test]
    fn test_parse_list_records_unknown() {
        let (parsed, unknown) =
            SpecialAbility::parse_list("Poison 1, Wibbling, Undead, Frobnicate 3");
        assert_eq!(parsed.len(), 2);
        assert_eq!(unknown, vec!["Wibbling".to_string(), "Frobnicate 3".to_string()]);
    }

    #[test]
    fn test_display_roundtrips_text_form() {
        let a = SpecialAbility::new(SpecialType::EnergyDrain, 2);
        assert_eq!(a.to_string(), "EnergyDrain 2");
        assert_eq!(a.to_string().parse::<SpecialAbility>().unwrap(), a);
    }

    #[test]
    fn test_list_queries() {
        let mut list: SpecialList = [
            SpecialAbility::new(SpecialType::Slowing, 0),
            SpecialAbility::new(SpecialType::Paralysis, 1),
        ]
        .into_iter()
        .collect();
        assert!(list.any_disabling());
        assert_eq!(list.param(SpecialType::Paralysis), 1);
        list.remove(SpecialType::Paralysis);
        assert!(!list.any_disabling());
        assert_eq!(list.len(), 1);
    }
}
