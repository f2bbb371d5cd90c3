//! Canonical condition strings
//!
//! A condition is shown in the grid, and typed back by users, as a stable
//! string key: each level renders as `<variable>:<value>[ <unit>]`, levels are
//! sorted lexicographically and joined with `"; "`. Two conditions are equal
//! exactly when their canonical strings are equal, which lets a drop-down
//! selection be mapped back to its experimental group.
//!
//! ```rust
//! use batchgrid::canonical;
//! use batchgrid::experiment::{Condition, ExperimentalValue, VariableLevel};
//!
//! let condition = Condition::new(vec![
//!     VariableLevel::new("time", ExperimentalValue::with_unit("2", "h")),
//!     VariableLevel::new("genotype", ExperimentalValue::new("wt")),
//! ])?;
//! assert_eq!(canonical::format(&condition), "genotype:wt; time:2 h");
//! # Ok::<(), batchgrid::Error>(())
//! ```

use std::borrow::Borrow;

use tracing::warn;

use crate::experiment::{Condition, ExperimentalGroup, VariableLevel};

/// Separator between rendered levels.
pub const LEVEL_SEPARATOR: &str = "; ";

/// Render one variable level as `<variable>:<value>[ <unit>]`.
#[must_use]
pub fn format_level(level: &VariableLevel) -> String {
    let value = level.value();
    let rendered = format!(
        "{}:{} {}",
        level.variable_name(),
        value.literal(),
        value.unit().unwrap_or_default()
    );
    rendered.trim().to_string()
}

/// Render a condition as its canonical string.
#[must_use]
pub fn format(condition: &Condition) -> String {
    let mut levels: Vec<String> = condition.levels().iter().map(format_level).collect();
    levels.sort_unstable();
    levels.join(LEVEL_SEPARATOR)
}

/// Iterate the groups whose condition renders exactly as `text`.
pub fn matching<'a, G>(text: &'a str, groups: &'a [G]) -> impl Iterator<Item = &'a G> + 'a
where
    G: Borrow<ExperimentalGroup>,
{
    groups.iter().filter(move |group| {
        let group: &ExperimentalGroup = (*group).borrow();
        format(group.condition()) == text
    })
}

/// Map a canonical string back to its experimental group.
///
/// Returns `None` when no group matches, or when more than one does (groups
/// of one experiment should have distinct conditions, so that case is
/// logged).
pub fn resolve<'a, G>(text: &str, groups: &'a [G]) -> Option<&'a G>
where
    G: Borrow<ExperimentalGroup>,
{
    let mut found = None;
    for candidate in groups {
        let group: &ExperimentalGroup = candidate.borrow();
        if format(group.condition()) != text {
            continue;
        }
        if found.is_some() {
            warn!(condition = text, "condition matches more than one experimental group");
            return None;
        }
        found = Some(candidate);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{BiologicalReplicate, ExperimentalValue, GroupId, ReplicateId};

    fn level(name: &str, value: ExperimentalValue) -> VariableLevel {
        VariableLevel::new(name, value)
    }

    fn group(id: u64, condition: Condition) -> ExperimentalGroup {
        ExperimentalGroup::new(
            GroupId(id),
            condition,
            vec![BiologicalReplicate::new(ReplicateId(id), "R1")],
        )
        .unwrap()
    }

    #[test]
    fn test_format_level_without_unit_has_no_trailing_space() {
        let rendered = format_level(&level("genotype", ExperimentalValue::new("wt")));
        assert_eq!(rendered, "genotype:wt");
    }

    #[test]
    fn test_format_level_with_unit() {
        let rendered = format_level(&level("size", ExperimentalValue::with_unit("20", "cm")));
        assert_eq!(rendered, "size:20 cm");
    }

    #[test]
    fn test_format_is_order_independent() {
        let a = Condition::new(vec![
            level("b", ExperimentalValue::new("1")),
            level("a", ExperimentalValue::new("2")),
        ])
        .unwrap();
        let b = Condition::new(vec![
            level("a", ExperimentalValue::new("2")),
            level("b", ExperimentalValue::new("1")),
        ])
        .unwrap();
        assert_eq!(format(&a), "a:2; b:1");
        assert_eq!(format(&a), format(&b));
    }

    #[test]
    fn test_format_empty_condition() {
        let empty = Condition::new(Vec::new()).unwrap();
        assert_eq!(format(&empty), "");
    }

    #[test]
    fn test_resolve_roundtrip() {
        let groups = vec![
            group(1, Condition::new(vec![level("g", ExperimentalValue::new("wt"))]).unwrap()),
            group(2, Condition::new(vec![level("g", ExperimentalValue::new("ko"))]).unwrap()),
        ];
        for g in &groups {
            let text = format(g.condition());
            assert_eq!(resolve(&text, &groups).map(ExperimentalGroup::id), Some(g.id()));
        }
    }

    #[test]
    fn test_resolve_unknown_text() {
        let groups = vec![group(
            1,
            Condition::new(vec![level("g", ExperimentalValue::new("wt"))]).unwrap(),
        )];
        assert!(resolve("g:mutant", &groups).is_none());
    }

    #[test]
    fn test_resolve_ambiguous_is_none() {
        let condition = Condition::new(vec![level("g", ExperimentalValue::new("wt"))]).unwrap();
        let groups = vec![group(1, condition.clone()), group(2, condition)];
        assert!(resolve("g:wt", &groups).is_none());
        assert_eq!(matching("g:wt", &groups).count(), 2);
    }
}
