// ABOUTME: Pure ingredient-set reconciliation for recipe create/update operations
// ABOUTME: Diffs existing lines against a desired submission into create/update/delete batches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! # Ingredient-set reconciliation
//!
//! Recipe writes carry a desired ingredient list. Instead of dropping and
//! re-inserting every line, [`reconcile`] computes the minimal set of storage
//! operations that move the stored lines to the desired state:
//!
//! - foodstuff absent from storage: create a line
//! - foodstuff present with a different amount: update that line's amount
//! - foodstuff present with the same amount: leave it alone
//! - stored foodstuff absent from the submission: delete the line
//!
//! The function is a pure computation over its inputs. Applying the resulting
//! plan (see `database::recipes`) happens inside one transaction together
//! with the rest of the recipe write, so readers never observe a
//! half-migrated line set.

use crate::errors::{AppError, AppResult};
use crate::models::{IngredientLine, IngredientRef};
use std::collections::{HashMap, HashSet};

/// An amount change for one existing line, keyed by line identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountUpdate {
    /// Identity of the line to update
    pub line_id: i64,
    /// New amount
    pub amount: i64,
}

/// The batched storage operations produced by [`reconcile`]
///
/// The three sets are pairwise disjoint by construction: a foodstuff id
/// appears in at most one of them, and `|create| + |update| + |delete|`
/// never exceeds `|existing ∪ desired|`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Lines to insert, in submission order
    pub to_create: Vec<IngredientRef>,
    /// Amount updates for surviving lines, in submission order
    pub to_update: Vec<AmountUpdate>,
    /// Foodstuff ids whose lines leave the recipe, ascending
    pub to_delete: Vec<i64>,
}

impl ReconcilePlan {
    /// True when applying the plan would change nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of storage operations in the plan
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}

/// Diff a recipe's existing ingredient lines against a desired submission
///
/// `existing` holds the recipe's current lines (empty on create), at most one
/// per foodstuff as enforced by the storage schema. `desired` is the
/// caller-supplied list of `(foodstuff_id, amount)` pairs.
///
/// Resubmitting an unchanged ingredient list yields an empty plan.
///
/// # Errors
///
/// Returns a [`crate::errors::ErrorCode::DuplicateIngredient`] validation
/// error when `desired` references the same foodstuff more than once; the
/// diff is not attempted in that case.
pub fn reconcile(
    existing: &[IngredientLine],
    desired: &[IngredientRef],
) -> AppResult<ReconcilePlan> {
    let mut seen = HashSet::with_capacity(desired.len());
    let mut duplicates: Vec<i64> = Vec::new();
    for item in desired {
        if !seen.insert(item.id) {
            duplicates.push(item.id);
        }
    }
    if !duplicates.is_empty() {
        duplicates.sort_unstable();
        duplicates.dedup();
        return Err(AppError::duplicate_ingredient(&duplicates));
    }

    let mut index: HashMap<i64, &IngredientLine> =
        existing.iter().map(|line| (line.foodstuff_id, line)).collect();

    let mut to_create = Vec::new();
    let mut to_update = Vec::new();
    for item in desired {
        match index.remove(&item.id) {
            None => to_create.push(*item),
            Some(line) if line.amount != item.amount => to_update.push(AmountUpdate {
                line_id: line.id,
                amount: item.amount,
            }),
            Some(_) => {} // amount unchanged
        }
    }

    // Whatever survived the walk has no counterpart in the submission.
    // Sorted so delete batches are deterministic.
    let mut to_delete: Vec<i64> = index.into_keys().collect();
    to_delete.sort_unstable();

    Ok(ReconcilePlan {
        to_create,
        to_update,
        to_delete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn line(id: i64, foodstuff_id: i64, amount: i64) -> IngredientLine {
        IngredientLine {
            id,
            recipe_id: 1,
            foodstuff_id,
            amount,
        }
    }

    const fn want(id: i64, amount: i64) -> IngredientRef {
        IngredientRef { id, amount }
    }

    /// Collect the foodstuff ids each plan bucket touches, resolving update
    /// line ids back through the existing lines
    fn touched_foodstuffs(
        plan: &ReconcilePlan,
        existing: &[IngredientLine],
    ) -> (Vec<i64>, Vec<i64>, Vec<i64>) {
        let by_line: HashMap<i64, i64> = existing
            .iter()
            .map(|l| (l.id, l.foodstuff_id))
            .collect();
        (
            plan.to_create.iter().map(|r| r.id).collect(),
            plan.to_update.iter().map(|u| by_line[&u.line_id]).collect(),
            plan.to_delete.clone(),
        )
    }

    #[test]
    fn test_create_only_for_new_foodstuff() {
        // existing = {(flour, 200)}, desired = {(flour, 200), (sugar, 50)}
        let existing = vec![line(10, 1, 200)];
        let desired = vec![want(1, 200), want(2, 50)];

        let plan = reconcile(&existing, &desired).unwrap();
        assert_eq!(plan.to_create, vec![want(2, 50)]);
        assert!(plan.to_update.is_empty());
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        // existing = {(flour, 200), (sugar, 50)}, desired = {(flour, 300)}
        let existing = vec![line(10, 1, 200), line(11, 2, 50)];
        let desired = vec![want(1, 300)];

        let plan = reconcile(&existing, &desired).unwrap();
        assert!(plan.to_create.is_empty());
        assert_eq!(
            plan.to_update,
            vec![AmountUpdate {
                line_id: 10,
                amount: 300
            }]
        );
        assert_eq!(plan.to_delete, vec![2]);
    }

    #[test]
    fn test_unchanged_resubmission_is_noop() {
        let existing = vec![line(10, 1, 200), line(11, 2, 50), line(12, 3, 7)];
        let desired = vec![want(1, 200), want(2, 50), want(3, 7)];

        let plan = reconcile(&existing, &desired).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.operation_count(), 0);
    }

    #[test]
    fn test_empty_both_sides() {
        let plan = reconcile(&[], &[]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_empty_desired_deletes_everything() {
        let existing = vec![line(10, 3, 9), line(11, 1, 4)];
        let plan = reconcile(&existing, &[]).unwrap();
        assert!(plan.to_create.is_empty());
        assert!(plan.to_update.is_empty());
        assert_eq!(plan.to_delete, vec![1, 3]);
    }

    #[test]
    fn test_empty_existing_creates_everything_in_order() {
        let desired = vec![want(5, 1), want(2, 8), want(9, 3)];
        let plan = reconcile(&[], &desired).unwrap();
        assert_eq!(plan.to_create, desired);
        assert!(plan.to_update.is_empty());
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn test_duplicate_foodstuff_rejected_before_diff() {
        let desired = vec![want(1, 200), want(1, 300)];
        let err = reconcile(&[], &desired).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateIngredient);
        assert_eq!(
            err.context.details,
            serde_json::json!({ "foodstuff_ids": [1] })
        );
    }

    #[test]
    fn test_duplicates_reported_sorted_and_deduped() {
        let desired = vec![
            want(7, 1),
            want(3, 1),
            want(7, 2),
            want(3, 5),
            want(3, 9),
            want(1, 1),
        ];
        let err = reconcile(&[], &desired).unwrap_err();
        assert_eq!(
            err.context.details,
            serde_json::json!({ "foodstuff_ids": [3, 7] })
        );
    }

    #[test]
    fn test_buckets_pairwise_disjoint_and_bounded() {
        let cases: Vec<(Vec<IngredientLine>, Vec<IngredientRef>)> = vec![
            (vec![], vec![]),
            (vec![line(1, 1, 5)], vec![]),
            (vec![], vec![want(1, 5)]),
            (
                vec![line(1, 1, 5), line(2, 2, 6), line(3, 3, 7)],
                vec![want(2, 60), want(4, 1), want(3, 7)],
            ),
            (
                vec![line(1, 4, 5), line(2, 8, 6)],
                vec![want(8, 6), want(4, 5)],
            ),
        ];

        for (existing, desired) in cases {
            let plan = reconcile(&existing, &desired).unwrap();
            let (created, updated, deleted) = touched_foodstuffs(&plan, &existing);

            let mut all: Vec<i64> = Vec::new();
            all.extend(&created);
            all.extend(&updated);
            all.extend(&deleted);
            let unique: HashSet<i64> = all.iter().copied().collect();
            assert_eq!(unique.len(), all.len(), "buckets must be pairwise disjoint");

            let universe: HashSet<i64> = existing
                .iter()
                .map(|l| l.foodstuff_id)
                .chain(desired.iter().map(|r| r.id))
                .collect();
            assert!(
                plan.operation_count() <= universe.len(),
                "operation count must not exceed |existing ∪ desired|"
            );
        }
    }

    #[test]
    fn test_second_pass_after_apply_is_empty() {
        let existing = vec![line(10, 1, 200), line(11, 2, 50)];
        let desired = vec![want(1, 300), want(3, 25)];

        let plan = reconcile(&existing, &desired).unwrap();
        assert!(!plan.is_empty());

        // Simulate applying the plan, then reconcile the same submission again
        let mut applied: Vec<IngredientLine> = existing
            .iter()
            .filter(|l| !plan.to_delete.contains(&l.foodstuff_id))
            .cloned()
            .collect();
        for update in &plan.to_update {
            if let Some(l) = applied.iter_mut().find(|l| l.id == update.line_id) {
                l.amount = update.amount;
            }
        }
        let mut next_id = 100;
        for created in &plan.to_create {
            applied.push(line(next_id, created.id, created.amount));
            next_id += 1;
        }

        let second = reconcile(&applied, &desired).unwrap();
        assert!(second.is_empty(), "reconcile must be idempotent");
    }
}
