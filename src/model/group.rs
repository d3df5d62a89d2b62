//! Field groups and their arena ids.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Displayed group members before the group is summarized by its size.
const DISPLAY_LIMIT: usize = 8;

/// Index of a [`FieldGroup`] inside a refined model.
///
/// Ids are dense: after refinement they run from `0` to `groups.len() - 1`
/// in order of first appearance across the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Position of the group in [`RefinedModel::groups`](super::RefinedModel::groups).
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered collection of interchangeable fields.
///
/// Every field of a group takes part in exactly the same rules, so only the
/// number of active fields in the group matters, never which ones. Equality
/// is structural and order-sensitive; the refinement compares content as a
/// multiset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldGroup<T> {
    fields: Vec<T>,
}

impl<T> FieldGroup<T> {
    /// Creates a group from its fields.
    pub fn new(fields: Vec<T>) -> Self {
        Self { fields }
    }

    /// The fields, in insertion order.
    pub fn fields(&self) -> &[T] {
        &self.fields
    }

    /// Number of fields (duplicates included).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the group has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.fields.iter()
    }

    /// Consumes the group, returning its fields.
    pub fn into_fields(self) -> Vec<T> {
        self.fields
    }
}

impl<T: PartialEq> FieldGroup<T> {
    /// Returns `true` if `field` is a member.
    pub fn contains(&self, field: &T) -> bool {
        self.fields.contains(field)
    }
}

impl<T> From<Vec<T>> for FieldGroup<T> {
    fn from(fields: Vec<T>) -> Self {
        Self::new(fields)
    }
}

impl<T> FromIterator<T> for FieldGroup<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a FieldGroup<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<T: fmt::Display> fmt::Display for FieldGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.len() > DISPLAY_LIMIT {
            return write!(f, "({} FIELDS)", self.fields.len());
        }
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(")")
    }
}
