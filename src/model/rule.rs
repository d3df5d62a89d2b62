//! Sum rules over fields and over refined groups.

use super::{FieldGroup, GroupId};
use crate::combinatorics::{ncr, ncr_big};
use num_bigint::BigUint;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An input rule: exactly `target` of `fields` are active.
///
/// # Examples
///
/// ```
/// use u_fieldprob::model::FieldRule;
///
/// let rule = FieldRule::new(vec!['a', 'b', 'c', 'd'], 2);
/// assert_eq!(rule.field_count(), 4);
/// assert_eq!(rule.combinations(), 6.0);
/// assert_eq!(rule.to_string(), "(a + b + c + d) = 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldRule<T> {
    label: Option<String>,
    fields: Vec<T>,
    target: usize,
}

impl<T> FieldRule<T> {
    /// Creates an unlabeled rule.
    pub fn new(fields: Vec<T>, target: usize) -> Self {
        Self {
            label: None,
            fields,
            target,
        }
    }

    /// Creates a rule carrying a label, typically the clue it came from.
    pub fn labeled(label: impl Into<String>, fields: Vec<T>, target: usize) -> Self {
        Self {
            label: Some(label.into()),
            fields,
            target,
        }
    }

    /// The label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The constrained fields.
    pub fn fields(&self) -> &[T] {
        &self.fields
    }

    /// Required number of active fields.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Number of constrained fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// `C(field_count, target)`: ways to satisfy this rule on its own.
    pub fn combinations(&self) -> f64 {
        ncr(self.fields.len() as i64, self.target as i64)
    }

    /// Exact `C(field_count, target)`.
    pub fn combinations_exact(&self) -> BigUint {
        ncr_big(self.fields.len() as i64, self.target as i64)
    }
}

impl<T: fmt::Display> fmt::Display for FieldRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label}: ")?;
        }
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{field}")?;
        }
        write!(f, ") = {}", self.target)
    }
}

/// A rule after refinement: the sum of active fields over `groups` equals
/// `target`.
///
/// Groups are referenced by id and are pairwise distinct within a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefinedRule {
    pub(crate) label: Option<String>,
    pub(crate) groups: Vec<GroupId>,
    pub(crate) target: usize,
}

impl RefinedRule {
    /// The label of the rule this one was refined from.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Referenced groups, non-shared pieces before shared ones.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    /// Required number of active fields over all groups.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Total number of fields over the referenced groups.
    pub fn field_count<T>(&self, groups: &[FieldGroup<T>]) -> usize {
        self.groups.iter().map(|id| groups[id.index()].len()).sum()
    }

    /// Id of the smallest referenced group, the first one on ties.
    ///
    /// Stops early at a group of size one.
    pub fn smallest_group<T>(&self, groups: &[FieldGroup<T>]) -> Option<GroupId> {
        let mut best: Option<(GroupId, usize)> = None;
        for &id in &self.groups {
            let size = groups[id.index()].len();
            if size == 1 {
                return Some(id);
            }
            if best.map_or(true, |(_, smallest)| size < smallest) {
                best = Some((id, size));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Renders the rule with its groups spelled out.
    pub fn describe<T: fmt::Display>(&self, groups: &[FieldGroup<T>]) -> String {
        let parts: Vec<String> = self
            .groups
            .iter()
            .map(|id| groups[id.index()].to_string())
            .collect();
        format!("{} = {}", parts.join(" + "), self.target)
    }
}
