//! Team narrowing over a fixed candidate pool.
//!
//! A trainer's real team is one `team_size`-subset of its pool. Given the
//! members already seen in battle, [`compute_remaining`] reports how many
//! subsets are still consistent with them and which pool members appear in
//! at least one of those subsets.

use schema::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

/// Number of Pokemon a Battle Subway trainer brings to a battle.
pub const TEAM_SIZE: usize = 4;

/// How [`compute_remaining`] obtains its answer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Binomial coefficient over the unseen members. Constant-time count.
    #[default]
    ClosedForm,
    /// Walks every combination of the pool. Kept as the reference answer.
    Enumerate,
}

/// Result of narrowing a pool: how many teams are left and who can be in them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub count: u64,
    pub union: BTreeSet<EntityId>,
}

impl Outcome {
    /// The "no consistent team" answer.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_satisfiable(&self) -> bool {
        self.count > 0
    }

    /// Members that could still show up, i.e. the union without what was already seen.
    pub fn remaining(&self, seen: &BTreeSet<EntityId>) -> BTreeSet<EntityId> {
        self.union.difference(seen).copied().collect()
    }
}

/// Count the `team_size`-subsets of `pool` that contain `seen`, and collect their members.
///
/// Inconsistent inputs (more seen than fit in a team, a seen member outside
/// the pool, a pool smaller than a team) are answered with [`Outcome::empty`].
pub fn compute_remaining(
    pool: &BTreeSet<EntityId>,
    seen: &BTreeSet<EntityId>,
    team_size: usize,
    strategy: Strategy,
) -> Outcome {
    if seen.len() > team_size {
        return Outcome::empty();
    }
    if !seen.is_subset(pool) {
        return Outcome::empty();
    }
    if pool.len() < team_size {
        return Outcome::empty();
    }

    match strategy {
        Strategy::ClosedForm => closed_form(pool, seen, team_size),
        Strategy::Enumerate => enumerate(pool, seen, team_size),
    }
}

fn closed_form(pool: &BTreeSet<EntityId>, seen: &BTreeSet<EntityId>, team_size: usize) -> Outcome {
    let free_slots = team_size - seen.len();
    let count = binomial(pool.len() - seen.len(), free_slots);
    if count == 0 {
        return Outcome::empty();
    }

    // With no free slot the only consistent team is the seen set itself.
    // Otherwise every unseen member can take one of the free slots.
    let union = if free_slots == 0 {
        seen.clone()
    } else {
        pool.clone()
    };
    Outcome { count, union }
}

fn enumerate(pool: &BTreeSet<EntityId>, seen: &BTreeSet<EntityId>, team_size: usize) -> Outcome {
    let members: Vec<EntityId> = pool.iter().copied().collect();
    let mut outcome = Outcome::empty();

    for team in Combinations::new(&members, team_size) {
        // `team` is sorted because `members` is.
        if !seen.iter().all(|id| team.binary_search(id).is_ok()) {
            continue;
        }
        outcome.count += 1;
        outcome.union.extend(team);
    }
    outcome
}

/// Exact `C(n, k)`, saturating at `u64::MAX`.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is divisible by (i + 1) at every step
        acc = match acc.checked_mul((n - i) as u128) {
            Some(product) => product / (i + 1) as u128,
            None => return u64::MAX,
        };
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

/// Lexicographic iterator over the `k`-combinations of a slice.
///
/// Yields each combination as a `Vec` in the slice's order, so a sorted
/// input produces sorted combinations.
pub struct Combinations<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a, T: Copy> Combinations<'a, T> {
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            indices: (0..k).collect(),
            exhausted: k > items.len(),
        }
    }

    fn current(&self) -> Vec<T> {
        self.indices.iter().map(|&i| self.items[i]).collect()
    }

    /// Move `indices` to the next combination, or mark the iterator exhausted.
    fn advance(&mut self) {
        let n = self.items.len();
        let k = self.indices.len();

        // Rightmost position that can still move right.
        let Some(pos) = (0..k).rev().find(|&i| self.indices[i] != i + n - k) else {
            self.exhausted = true;
            return;
        };
        self.indices[pos] += 1;
        for i in pos + 1..k {
            self.indices[i] = self.indices[i - 1] + 1;
        }
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let combination = self.current();
        self.advance();
        Some(combination)
    }
}
