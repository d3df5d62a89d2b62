//! Multiset intersection of two field groups.

use super::FieldGroup;
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::Hash;

/// The three pieces of splitting group `a` against group `b`.
///
/// A field present `k` times in `a` and `m` times in `b` lands `min(k, m)`
/// times in [`both`](Self::both). The invariants `only_a + both == a` and
/// `both + only_b == b` hold as multisets; field order follows the input
/// groups.
#[derive(Debug, Clone)]
pub struct GroupSplit<'a, T: Clone> {
    only_a: FieldGroup<T>,
    both: Cow<'a, FieldGroup<T>>,
    only_b: FieldGroup<T>,
}

impl<'a, T: Clone + Eq + Hash> GroupSplit<'a, T> {
    /// Splits `a` against `b`.
    ///
    /// Returns `None` when the groups share no field. When both groups hold
    /// the same fields, [`both`](Self::both) borrows `a` itself and the two
    /// exclusive pieces are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_fieldprob::model::{FieldGroup, GroupSplit};
    ///
    /// let a = FieldGroup::new(vec!['a', 'b', 'c']);
    /// let b = FieldGroup::new(vec!['b', 'c', 'd', 'e']);
    /// let split = GroupSplit::split(&a, &b).unwrap();
    /// assert_eq!(split.only_a().fields(), &['a']);
    /// assert_eq!(split.both().fields(), &['b', 'c']);
    /// assert_eq!(split.only_b().fields(), &['d', 'e']);
    /// ```
    pub fn split(a: &'a FieldGroup<T>, b: &FieldGroup<T>) -> Option<Self> {
        let mut unmatched_b: HashMap<&T, usize> = HashMap::new();
        for field in b {
            *unmatched_b.entry(field).or_insert(0) += 1;
        }

        let mut only_a = Vec::new();
        let mut both = Vec::new();
        let mut shared: HashMap<&T, usize> = HashMap::new();
        for field in a {
            match unmatched_b.get_mut(field) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    *shared.entry(field).or_insert(0) += 1;
                    both.push(field.clone());
                }
                _ => only_a.push(field.clone()),
            }
        }
        if both.is_empty() {
            return None;
        }

        let mut only_b = Vec::new();
        for field in b {
            match shared.get_mut(field) {
                Some(left) if *left > 0 => *left -= 1,
                _ => only_b.push(field.clone()),
            }
        }

        assert_eq!(only_a.len() + both.len(), a.len(), "split lost fields of a");
        assert_eq!(only_b.len() + both.len(), b.len(), "split lost fields of b");

        let both = if only_a.is_empty() && only_b.is_empty() {
            Cow::Borrowed(a)
        } else {
            Cow::Owned(FieldGroup::new(both))
        };
        Some(Self {
            only_a: FieldGroup::new(only_a),
            both,
            only_b: FieldGroup::new(only_b),
        })
    }
}

impl<'a, T: Clone> GroupSplit<'a, T> {
    /// Fields only in `a`.
    pub fn only_a(&self) -> &FieldGroup<T> {
        &self.only_a
    }

    /// Fields in both groups.
    pub fn both(&self) -> &FieldGroup<T> {
        &self.both
    }

    /// Fields only in `b`.
    pub fn only_b(&self) -> &FieldGroup<T> {
        &self.only_b
    }

    /// Returns `true` unless `a` and `b` hold the same fields.
    pub fn split_performed(&self) -> bool {
        !self.only_a.is_empty() || !self.only_b.is_empty()
    }

    /// Consumes the split, returning `(only_a, both, only_b)`.
    pub fn into_parts(self) -> (FieldGroup<T>, FieldGroup<T>, FieldGroup<T>) {
        (self.only_a, self.both.into_owned(), self.only_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(fields: &str) -> FieldGroup<char> {
        fields.chars().collect()
    }

    #[test]
    fn test_disjoint_groups_do_not_split() {
        assert!(GroupSplit::split(&group("abc"), &group("def")).is_none());
    }

    #[test]
    fn test_identical_groups_borrow_a() {
        let a = group("abc");
        let b = group("cab");
        let split = GroupSplit::split(&a, &b).unwrap();
        assert!(!split.split_performed());
        assert!(std::ptr::eq(split.both(), &a), "both must be a itself");
        assert!(split.only_a().is_empty());
        assert!(split.only_b().is_empty());
    }

    #[test]
    fn test_partial_overlap() {
        let a = group("abc");
        let b = group("bcde");
        let split = GroupSplit::split(&a, &b).unwrap();
        assert!(split.split_performed());
        assert_eq!(split.only_a(), &group("a"));
        assert_eq!(split.both(), &group("bc"));
        assert_eq!(split.only_b(), &group("de"));
    }

    #[test]
    fn test_subset() {
        let a = group("ab");
        let b = group("abcd");
        let split = GroupSplit::split(&a, &b).unwrap();
        assert!(split.split_performed());
        assert!(split.only_a().is_empty());
        assert_eq!(split.both(), &group("ab"));
        assert_eq!(split.only_b(), &group("cd"));
    }

    #[test]
    fn test_duplicate_fields_use_min_count() {
        let a = group("abb");
        let b = group("bbcc");
        let split = GroupSplit::split(&a, &b).unwrap();
        assert_eq!(split.only_a(), &group("a"));
        assert_eq!(split.both(), &group("bb"));
        assert_eq!(split.only_b(), &group("cc"));

        let a = group("abbb");
        let b = group("bc");
        let (only_a, both, only_b) = GroupSplit::split(&a, &b).unwrap().into_parts();
        assert_eq!(only_a, group("abb"));
        assert_eq!(both, group("b"));
        assert_eq!(only_b, group("c"));
    }
}
