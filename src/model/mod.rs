//! Constraint model: fields, groups and rules.
//!
//! Users describe the problem as [`FieldRule`]s, each saying that exactly
//! `target` of its fields are active. Rules that share fields are refined by
//! [`ModelBuilder`] into a common partition of interchangeable
//! [`FieldGroup`]s, so the solver reasons about "how many fields of this
//! group are active" instead of individual fields.
//!
//! # Refinement
//!
//! Two overlapping groups `A` and `B` become `A \ B`, `A ∩ B` and `B \ A`
//! ([`GroupSplit`]). Rules referencing `A` or `B` are rewritten to reference
//! the pieces, repeated until every pair of groups is identical or
//! disjoint. Content-identical groups from different rules collapse into
//! one [`GroupId`].

mod builder;
mod group;
mod rule;
mod split;

pub use builder::{ModelBuilder, RefinedModel};
pub use group::{FieldGroup, GroupId};
pub use rule::{FieldRule, RefinedRule};
pub use split::GroupSplit;
