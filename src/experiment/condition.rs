//! Condition - the variable/value assignment shared by one experimental group

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A measured value of an experimental variable, optionally with a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentalValue {
    literal: String,
    unit: Option<String>,
}

impl ExperimentalValue {
    /// Create a unit-less value.
    #[must_use]
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            unit: None,
        }
    }

    /// Create a value carrying a unit (e.g. `20` `cm`).
    #[must_use]
    pub fn with_unit(literal: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            unit: Some(unit.into()),
        }
    }

    /// Get the literal value.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Get the unit, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

/// One level of one experimental variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableLevel {
    variable_name: String,
    value: ExperimentalValue,
}

impl VariableLevel {
    /// Create a variable level.
    #[must_use]
    pub fn new(variable_name: impl Into<String>, value: ExperimentalValue) -> Self {
        Self {
            variable_name: variable_name.into(),
            value,
        }
    }

    /// Get the variable name.
    #[must_use]
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Get the value.
    #[must_use]
    pub const fn value(&self) -> &ExperimentalValue {
        &self.value
    }
}

/// Condition: an unordered set of variable levels, one per variable.
///
/// Levels keep their insertion order for display, but equality is set
/// equality: two conditions built from the same levels in a different order
/// are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<VariableLevel>", into = "Vec<VariableLevel>")]
pub struct Condition {
    levels: Vec<VariableLevel>,
}

impl Condition {
    /// Create a condition from its levels.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if two levels name the same variable.
    pub fn new(levels: impl IntoIterator<Item = VariableLevel>) -> Result<Self> {
        let levels: Vec<VariableLevel> = levels.into_iter().collect();
        for (i, level) in levels.iter().enumerate() {
            if levels[..i]
                .iter()
                .any(|seen| seen.variable_name == level.variable_name)
            {
                return Err(Error::InvalidInput(format!(
                    "condition has more than one level for variable '{}'",
                    level.variable_name
                )));
            }
        }
        Ok(Self { levels })
    }

    /// Get the levels in insertion order.
    #[must_use]
    pub fn levels(&self) -> &[VariableLevel] {
        &self.levels
    }

    /// Get the level of a variable, if the condition assigns one.
    #[must_use]
    pub fn level_of(&self, variable_name: &str) -> Option<&VariableLevel> {
        self.levels
            .iter()
            .find(|level| level.variable_name == variable_name)
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the condition assigns no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.levels.len() == other.levels.len()
            && self.levels.iter().all(|level| other.levels.contains(level))
    }
}

impl Eq for Condition {}

impl TryFrom<Vec<VariableLevel>> for Condition {
    type Error = Error;

    fn try_from(levels: Vec<VariableLevel>) -> Result<Self> {
        Self::new(levels)
    }
}

impl From<Condition> for Vec<VariableLevel> {
    fn from(condition: Condition) -> Self {
        condition.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(name: &str, value: &str) -> VariableLevel {
        VariableLevel::new(name, ExperimentalValue::new(value))
    }

    #[test]
    fn test_condition_rejects_duplicate_variable() {
        let result = Condition::new(vec![level("genotype", "wt"), level("genotype", "ko")]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_condition_equality_ignores_order() {
        let a = Condition::new(vec![level("genotype", "wt"), level("time", "2h")]).unwrap();
        let b = Condition::new(vec![level("time", "2h"), level("genotype", "wt")]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_condition_level_of() {
        let condition = Condition::new(vec![VariableLevel::new(
            "size",
            ExperimentalValue::with_unit("20", "cm"),
        )])
        .unwrap();
        let size = condition.level_of("size").unwrap();
        assert_eq!(size.value().unit(), Some("cm"));
        assert!(condition.level_of("hue").is_none());
    }

    #[test]
    fn test_condition_deserialize_rejects_duplicates() {
        let json = r#"[
            {"variable_name": "a", "value": {"literal": "1", "unit": null}},
            {"variable_name": "a", "value": {"literal": "2", "unit": null}}
        ]"#;
        assert!(serde_json::from_str::<Condition>(json).is_err());
    }
}
