//! Backtracking search over group counts.
//!
//! The search assigns each group the number of its active fields. After
//! every assignment, bounds propagation narrows the open groups:
//!
//! - a rule fails when its assigned sum exceeds the target or when the
//!   target cannot be reached even with every open field active;
//! - an open group `g` in rule `r` must lie in
//!   `[target - sum - (open - size(g)), target - sum]`, clipped to
//!   `[0, size(g)]`;
//! - a group whose bounds meet is assigned without branching.
//!
//! Branching picks the open group with the smallest domain, preferring
//! groups in more rules. The search runs on an explicit stack of frames
//! with an undo trail, so depth is bounded only by memory.

use super::config::SolverConfig;
use crate::error::{AnalyzeError, Result};
use crate::model::RefinedModel;
use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// A branching point: `group` still has values `next..=hi` to try.
#[derive(Debug, Clone, Copy)]
struct Frame {
    group: usize,
    next: usize,
    hi: usize,
    /// Trail length when the frame was pushed.
    trail_len: usize,
}

pub(crate) struct SearchOutcome {
    /// One count per group for every solution, in discovery order.
    pub assignments: Vec<Vec<usize>>,
    pub steps: usize,
}

pub(crate) struct Search<'a> {
    config: &'a SolverConfig,
    cancel: Option<&'a AtomicBool>,
    sizes: Vec<usize>,
    targets: Vec<usize>,
    group_rules: Vec<Vec<usize>>,
    values: Vec<Option<usize>>,
    assigned_sum: Vec<usize>,
    open_capacity: Vec<usize>,
    trail: Vec<usize>,
    steps: usize,
}

impl<'a> Search<'a> {
    pub fn new<T>(
        model: &RefinedModel<T>,
        config: &'a SolverConfig,
        cancel: Option<&'a AtomicBool>,
    ) -> Self {
        let sizes: Vec<usize> = model.groups().iter().map(|g| g.len()).collect();
        let mut group_rules = vec![Vec::new(); sizes.len()];
        let mut targets = Vec::with_capacity(model.rules().len());
        let mut open_capacity = Vec::with_capacity(model.rules().len());
        for (r, rule) in model.rules().iter().enumerate() {
            for id in rule.groups() {
                group_rules[id.index()].push(r);
            }
            open_capacity.push(rule.field_count(model.groups()));
            targets.push(rule.target());
        }
        Self {
            config,
            cancel,
            values: vec![None; sizes.len()],
            assigned_sum: vec![0; targets.len()],
            sizes,
            targets,
            group_rules,
            open_capacity,
            trail: Vec::new(),
            steps: 0,
        }
    }

    pub fn run(mut self) -> Result<SearchOutcome> {
        let mut assignments = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        if self.propagate() {
            match self.pick_branch() {
                None => assignments.push(self.snapshot()),
                Some((group, lo, hi)) => stack.push(Frame {
                    group,
                    next: lo,
                    hi,
                    trail_len: self.trail.len(),
                }),
            }
        }

        while let Some(frame) = stack.last_mut() {
            let trail_len = frame.trail_len;
            if frame.next > frame.hi {
                stack.pop();
                self.undo_to(trail_len);
                continue;
            }
            let (group, value) = (frame.group, frame.next);
            frame.next += 1;

            self.tick()?;
            self.undo_to(trail_len);
            self.assign(group, value);
            if !self.propagate() {
                continue;
            }
            match self.pick_branch() {
                None => {
                    trace!(event = "solution_found", index = assignments.len());
                    assignments.push(self.snapshot());
                }
                Some((group, lo, hi)) => stack.push(Frame {
                    group,
                    next: lo,
                    hi,
                    trail_len: self.trail.len(),
                }),
            }
        }

        Ok(SearchOutcome {
            assignments,
            steps: self.steps,
        })
    }

    fn tick(&mut self) -> Result<()> {
        self.steps += 1;
        if self.config.max_steps > 0 && self.steps > self.config.max_steps {
            return Err(AnalyzeError::BudgetExceeded {
                limit: self.config.max_steps,
            });
        }
        if let Some(flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(AnalyzeError::Cancelled);
            }
        }
        Ok(())
    }

    fn assign(&mut self, group: usize, value: usize) {
        debug_assert!(self.values[group].is_none(), "group {group} assigned twice");
        self.values[group] = Some(value);
        let size = self.sizes[group];
        for &r in &self.group_rules[group] {
            self.assigned_sum[r] += value;
            self.open_capacity[r] -= size;
        }
        self.trail.push(group);
    }

    fn undo_to(&mut self, len: usize) {
        while self.trail.len() > len {
            let Some(group) = self.trail.pop() else { break };
            let value = self.values[group].take().unwrap_or(0);
            let size = self.sizes[group];
            for &r in &self.group_rules[group] {
                self.assigned_sum[r] -= value;
                self.open_capacity[r] += size;
            }
        }
    }

    /// Checks every rule and forces single-valued groups until nothing
    /// changes. Returns `false` on a conflict.
    fn propagate(&mut self) -> bool {
        loop {
            for r in 0..self.targets.len() {
                let sum = self.assigned_sum[r];
                let target = self.targets[r];
                if sum > target || target > sum + self.open_capacity[r] {
                    return false;
                }
            }
            let mut changed = false;
            for group in 0..self.sizes.len() {
                if self.values[group].is_some() {
                    continue;
                }
                match self.bounds(group) {
                    None => return false,
                    Some((lo, hi)) if lo == hi => {
                        self.assign(group, lo);
                        changed = true;
                    }
                    Some(_) => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Feasible count interval of an open group, `None` when empty.
    fn bounds(&self, group: usize) -> Option<(usize, usize)> {
        let size = self.sizes[group];
        let mut lo = 0;
        let mut hi = size;
        for &r in &self.group_rules[group] {
            let remaining = self.targets[r].checked_sub(self.assigned_sum[r])?;
            let other_capacity = self.open_capacity[r] - size;
            hi = hi.min(remaining);
            lo = lo.max(remaining.saturating_sub(other_capacity));
        }
        (lo <= hi).then_some((lo, hi))
    }

    fn pick_branch(&self) -> Option<(usize, usize, usize)> {
        (0..self.sizes.len())
            .filter(|&g| self.values[g].is_none())
            .filter_map(|g| self.bounds(g).map(|(lo, hi)| (g, lo, hi)))
            .min_by_key(|&(g, lo, hi)| (hi - lo, Reverse(self.group_rules[g].len()), g))
    }

    fn snapshot(&self) -> Vec<usize> {
        self.values.iter().map(|v| v.unwrap_or(0)).collect()
    }
}
