//! Refinement of overlapping rules into interchangeable groups.

use super::{FieldGroup, FieldRule, GroupId, GroupSplit, RefinedRule};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rules over a common refinement of their fields.
///
/// Any two groups are either the same id or disjoint, every group is
/// referenced by at least one rule, and ids are dense.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefinedModel<T> {
    groups: Vec<FieldGroup<T>>,
    rules: Vec<RefinedRule>,
}

impl<T> RefinedModel<T> {
    /// The groups, indexed by [`GroupId::index`].
    pub fn groups(&self) -> &[FieldGroup<T>] {
        &self.groups
    }

    /// The refined rules, in insertion order.
    pub fn rules(&self) -> &[RefinedRule] {
        &self.rules
    }

    /// The group with id `id`.
    pub fn group(&self, id: GroupId) -> &FieldGroup<T> {
        &self.groups[id.index()]
    }

    /// Consumes the model, returning `(groups, rules)`.
    pub fn into_parts(self) -> (Vec<FieldGroup<T>>, Vec<RefinedRule>) {
        (self.groups, self.rules)
    }
}

/// Collects rules and refines their fields into groups.
///
/// Every rule starts out as a single group holding all of its fields.
/// [`build`](Self::build) then splits groups of different rules against
/// each other until no two groups partially overlap. A split replaces a
/// group in every rule that references it by its pieces, so each rule still
/// covers the same fields with the same target.
///
/// # Examples
///
/// ```
/// use u_fieldprob::model::{FieldRule, ModelBuilder};
///
/// let mut builder = ModelBuilder::new();
/// builder
///     .add_rule(&FieldRule::new(vec!['a', 'b', 'c'], 2))
///     .add_rule(&FieldRule::new(vec!['b', 'c', 'd', 'e'], 2));
/// let model = builder.build();
///
/// assert_eq!(model.groups().len(), 3);
/// assert_eq!(model.rules()[0].describe(model.groups()), "(a) + (b + c) = 2");
/// assert_eq!(model.rules()[1].describe(model.groups()), "(d + e) + (b + c) = 2");
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder<T> {
    /// Every group ever created; split groups stay as unreferenced entries.
    arena: Vec<FieldGroup<T>>,
    rules: Vec<RefinedRule>,
}

impl<T> Default for ModelBuilder<T> {
    fn default() -> Self {
        Self {
            arena: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> ModelBuilder<T> {
    /// Creates a builder without rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule as one group of all its fields.
    pub fn add_rule(&mut self, rule: &FieldRule<T>) -> &mut Self {
        let group = FieldGroup::new(rule.fields().to_vec());
        self.add_group_rule(rule.label().map(str::to_owned), vec![group], rule.target())
    }

    /// Adds a rule over already separated groups.
    ///
    /// The groups of one rule are expected to be disjoint; only groups of
    /// different rules are split against each other.
    pub fn add_group_rule(
        &mut self,
        label: Option<String>,
        groups: Vec<FieldGroup<T>>,
        target: usize,
    ) -> &mut Self {
        let ids = groups.into_iter().map(|group| self.push(group)).collect();
        self.rules.push(RefinedRule {
            label,
            groups: ids,
            target,
        });
        self
    }

    /// Number of rules added so far.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Refines the groups to a fixed point and compacts the ids.
    ///
    /// Terminates because every split strictly lowers the sum of squared
    /// sizes over the referenced groups.
    pub fn build(mut self) -> RefinedModel<T> {
        let mut disjoint = HashSet::new();
        let mut splits = 0usize;
        while let Some((a, b)) = self.next_overlap(&mut disjoint) {
            self.split_pair(a, b);
            splits += 1;
        }
        let model = self.compact();
        debug!(
            event = "model_refined",
            rules = model.rules.len(),
            groups = model.groups.len(),
            splits,
        );
        model
    }

    fn push(&mut self, group: FieldGroup<T>) -> GroupId {
        self.arena.push(group);
        GroupId(self.arena.len() - 1)
    }

    /// Finds two groups of different rules that share a field.
    ///
    /// Group contents never change once created, so a pair found disjoint
    /// stays disjoint and is remembered in `disjoint`.
    fn next_overlap(&self, disjoint: &mut HashSet<(GroupId, GroupId)>) -> Option<(GroupId, GroupId)> {
        for (i, first) in self.rules.iter().enumerate() {
            for second in &self.rules[i + 1..] {
                for &a in &first.groups {
                    for &b in &second.groups {
                        if a == b {
                            continue;
                        }
                        let key = (a.min(b), a.max(b));
                        if disjoint.contains(&key) {
                            continue;
                        }
                        if shares_field(&self.arena[a.index()], &self.arena[b.index()]) {
                            return Some((a, b));
                        }
                        disjoint.insert(key);
                    }
                }
            }
        }
        None
    }

    fn split_pair(&mut self, a: GroupId, b: GroupId) {
        let split = match GroupSplit::split(&self.arena[a.index()], &self.arena[b.index()]) {
            Some(split) => split,
            None => return,
        };
        let identical = !split.split_performed();
        let (only_a, both, only_b) = split.into_parts();

        if identical {
            trace!(event = "group_merged", kept = a.index(), merged = b.index());
            self.replace(&[(b, vec![a])]);
            return;
        }

        trace!(
            event = "group_split",
            a = a.index(),
            b = b.index(),
            only_a = only_a.len(),
            both = both.len(),
            only_b = only_b.len(),
        );
        let both_id = if only_b.is_empty() {
            b
        } else if only_a.is_empty() {
            a
        } else {
            self.push(both)
        };
        let only_a_id = (!only_a.is_empty()).then(|| self.push(only_a));
        let only_b_id = (!only_b.is_empty()).then(|| self.push(only_b));

        let a_pieces: Vec<GroupId> = only_a_id.into_iter().chain([both_id]).collect();
        let b_pieces: Vec<GroupId> = only_b_id.into_iter().chain([both_id]).collect();
        self.replace(&[(a, a_pieces), (b, b_pieces)]);
    }

    /// Rewrites every rule, substituting groups in place and dropping
    /// repeated ids.
    fn replace(&mut self, replacements: &[(GroupId, Vec<GroupId>)]) {
        for rule in &mut self.rules {
            if !rule
                .groups
                .iter()
                .any(|id| replacements.iter().any(|(old, _)| old == id))
            {
                continue;
            }
            let mut seen = HashSet::new();
            let mut groups = Vec::with_capacity(rule.groups.len() + 1);
            for &id in &rule.groups {
                let pieces = replacements
                    .iter()
                    .find(|(old, _)| *old == id)
                    .map(|(_, pieces)| pieces.as_slice())
                    .unwrap_or(std::slice::from_ref(&id));
                for &piece in pieces {
                    if seen.insert(piece) {
                        groups.push(piece);
                    }
                }
            }
            rule.groups = groups;
        }
    }

    /// Drops empty and unreferenced groups and renumbers the rest in order
    /// of first appearance.
    fn compact(self) -> RefinedModel<T> {
        let mut arena: Vec<Option<FieldGroup<T>>> = self.arena.into_iter().map(Some).collect();
        let mut remap: HashMap<GroupId, GroupId> = HashMap::new();
        let mut groups = Vec::new();
        let mut rules = Vec::with_capacity(self.rules.len());

        for mut rule in self.rules {
            let mut ids = Vec::with_capacity(rule.groups.len());
            for id in rule.groups {
                if let Some(&new_id) = remap.get(&id) {
                    ids.push(new_id);
                    continue;
                }
                match arena[id.index()].take() {
                    Some(group) if !group.is_empty() => {
                        let new_id = GroupId(groups.len());
                        groups.push(group);
                        remap.insert(id, new_id);
                        ids.push(new_id);
                    }
                    _ => {}
                }
            }
            rule.groups = ids;
            rules.push(rule);
        }
        RefinedModel { groups, rules }
    }
}

fn shares_field<T: Eq + Hash>(a: &FieldGroup<T>, b: &FieldGroup<T>) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if small.len() <= 4 {
        return small.iter().any(|field| large.contains(field));
    }
    let members: HashSet<&T> = large.iter().collect();
    small.iter().any(|field| members.contains(field))
}
