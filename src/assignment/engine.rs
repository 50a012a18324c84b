//! Question assignment and rotation across challenge sites.
//!
//! The engine owns one `SiteState` per active site, the global set of
//! questions that have been asked this game, and a lap-based deck used for
//! lazy assignment. Site maps use `im` so game snapshots clone in O(1).
//!
//! ## Replacement priority
//!
//! When a site rotates, the replacement is picked uniformly at random from
//! the first non-empty tier:
//! 1. never asked in this game, not active at any other site, not the current question
//! 2. not active at any other site (current question allowed as a last resort of this tier)
//! 3. different from the current question
//! 4. anything in the pool
//!
//! With at least as many distinct questions as active sites, tier 2 always
//! finds a question no other site is using.

use std::fmt::Debug;

use im::{OrdMap, OrdSet};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::site::SiteState;
use crate::core::{GameRng, RotationPolicy};
use crate::deck::{shuffled, Deck};
use crate::questions::QuestionId;

/// How an answer at a site was judged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Right answer.
    Correct,
    /// Wrong answer, with the chosen option when the format has options.
    Wrong(Option<usize>),
}

/// A question swap at a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotation {
    /// Question before the swap.
    pub from: QuestionId,
    /// Question after the swap.
    pub to: QuestionId,
}

/// Maps challenge sites to questions.
///
/// `K` is the site key: a card index for the match game, a cell number for
/// the board game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Ord + Clone + Serialize",
    deserialize = "K: Ord + Clone + Deserialize<'de>"
))]
pub struct AssignmentEngine<K: Ord + Clone> {
    pool: Vec<QuestionId>,
    sites: OrdMap<K, SiteState>,
    used: OrdSet<QuestionId>,
    deck: Deck<QuestionId>,
}

impl<K> AssignmentEngine<K>
where
    K: Ord + Clone + Debug,
{
    /// Create an engine over the given question IDs.
    pub fn new(pool: Vec<QuestionId>, rng: &mut GameRng) -> Self {
        let deck = Deck::new(pool.clone(), rng);
        Self {
            pool,
            sites: OrdMap::new(),
            used: OrdSet::new(),
            deck,
        }
    }

    /// Drop every site and the asked history, keeping the pool.
    pub fn reset(&mut self, rng: &mut GameRng) {
        self.sites = OrdMap::new();
        self.used = OrdSet::new();
        self.deck = Deck::new(self.pool.clone(), rng);
    }

    // === Queries ===

    /// State of a site, if it has one.
    #[must_use]
    pub fn site(&self, key: &K) -> Option<&SiteState> {
        self.sites.get(key)
    }

    /// Question posed at a site, if assigned.
    #[must_use]
    pub fn question_at(&self, key: &K) -> Option<QuestionId> {
        self.sites.get(key).map(|s| s.question)
    }

    /// Disabled options at a site (empty when the site has no state).
    #[must_use]
    pub fn disabled_options(&self, key: &K) -> Vec<usize> {
        self.sites
            .get(key)
            .map(|s| s.wrong_options.to_vec())
            .unwrap_or_default()
    }

    /// Wrong answers at a site since its last assignment.
    #[must_use]
    pub fn wrong_attempts(&self, key: &K) -> u32 {
        self.sites.get(key).map_or(0, |s| s.wrong_attempts)
    }

    /// Active sites in key order.
    pub fn sites(&self) -> impl Iterator<Item = (&K, &SiteState)> {
        self.sites.iter()
    }

    /// Number of active sites.
    #[must_use]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Whether a question has been asked anywhere this game.
    #[must_use]
    pub fn was_asked(&self, question: QuestionId) -> bool {
        self.used.contains(&question)
    }

    /// Questions asked this game, ascending.
    #[must_use]
    pub fn asked_questions(&self) -> Vec<QuestionId> {
        self.used.iter().copied().collect()
    }

    /// Question IDs this engine draws from.
    #[must_use]
    pub fn pool(&self) -> &[QuestionId] {
        &self.pool
    }

    fn active_elsewhere(&self, key: &K) -> FxHashSet<QuestionId> {
        self.sites
            .iter()
            .filter(|(k, _)| *k != key)
            .map(|(_, s)| s.question)
            .collect()
    }

    // === Assignment ===

    /// Assign questions to every listed site that has none yet, maximizing
    /// uniqueness across the board. Sites not listed are dropped.
    ///
    /// Walks `sites` in order, taking the next question from a shuffled pool
    /// copy that is not already on the board. When the pool is smaller than
    /// the board, questions are reused cyclically.
    pub fn assign_initial(&mut self, sites: &[K], rng: &mut GameRng) {
        let stale: Vec<K> = self
            .sites
            .keys()
            .filter(|k| !sites.contains(k))
            .cloned()
            .collect();
        for key in &stale {
            self.sites.remove(key);
        }
        if self.pool.is_empty() {
            warn!(target: "assignment", "empty question pool; sites left unassigned");
            return;
        }

        let order = shuffled(rng, &self.pool);
        let mut assigned: FxHashSet<QuestionId> = self.sites.values().map(|s| s.question).collect();
        let mut cursor = 0usize;

        for key in sites {
            if self.sites.contains_key(key) {
                continue;
            }
            let pick = (0..order.len())
                .map(|tries| (cursor + tries) % order.len())
                .find(|&i| !assigned.contains(&order[i]));

            let question = match pick {
                Some(i) => {
                    cursor = (i + 1) % order.len();
                    order[i]
                }
                None => {
                    let q = order[cursor];
                    cursor = (cursor + 1) % order.len();
                    q
                }
            };
            assigned.insert(question);
            self.sites.insert(key.clone(), SiteState::new(question));
        }
        debug!(target: "assignment", sites = sites.len(), pool = self.pool.len(), "initial questions assigned");
    }

    /// Question at `key`, assigning one lazily from the deck when absent.
    ///
    /// Draws up to one lap looking for a question no other site is using;
    /// falls back to the first draw. `None` only for an empty pool.
    pub fn ensure(&mut self, key: &K, rng: &mut GameRng) -> Option<QuestionId> {
        if let Some(site) = self.sites.get(key) {
            return Some(site.question);
        }
        let busy = self.active_elsewhere(key);
        let mut first = None;
        let mut chosen = None;
        for _ in 0..self.deck.len() {
            let Some(candidate) = self.deck.draw_next(rng) else {
                break;
            };
            first.get_or_insert(candidate);
            if !busy.contains(&candidate) {
                chosen = Some(candidate);
                break;
            }
        }
        let question = chosen.or(first)?;
        self.sites.insert(key.clone(), SiteState::new(question));
        Some(question)
    }

    /// Forget a site entirely (matched card).
    pub fn remove(&mut self, key: &K) -> Option<SiteState> {
        self.sites.remove(key)
    }

    /// Mark the site's question as asked; it joins the global asked set.
    pub fn mark_asked(&mut self, key: &K) {
        if let Some(site) = self.sites.get_mut(key) {
            if !site.asked {
                site.asked = true;
                self.used.insert(site.question);
            }
        }
    }

    /// Record a revealed answer character at a site.
    pub fn record_reveal(&mut self, key: &K, index: usize, max: usize) -> bool {
        self.sites
            .get_mut(key)
            .is_some_and(|site| site.record_reveal(index, max))
    }

    /// Apply a judged answer under `policy`, rotating the question when due.
    pub fn judge(
        &mut self,
        key: &K,
        verdict: Verdict,
        policy: RotationPolicy,
        rng: &mut GameRng,
    ) -> Option<Rotation> {
        let site = self.sites.get_mut(key)?;
        let rotate = match verdict {
            Verdict::Correct => policy.on_correct,
            Verdict::Wrong(option) => {
                site.record_wrong(option);
                policy.wrong_limit_reached(site.wrong_attempts)
            }
        };
        if rotate {
            self.reassign(key, rng)
        } else {
            None
        }
    }

    /// Replace the question at `key` and reset its wrong history.
    pub fn reassign(&mut self, key: &K, rng: &mut GameRng) -> Option<Rotation> {
        let from = self.sites.get(key)?.question;
        let to = self.pick_replacement(key, from, rng)?;
        self.sites.insert(key.clone(), SiteState::new(to));
        debug!(target: "assignment", site = ?key, from = %from, to = %to, "question rotated");
        Some(Rotation { from, to })
    }

    fn pick_replacement(
        &self,
        key: &K,
        current: QuestionId,
        rng: &mut GameRng,
    ) -> Option<QuestionId> {
        let busy = self.active_elsewhere(key);
        let fresh = |q: &QuestionId| !self.used.contains(q) && !busy.contains(q) && *q != current;
        let free_other = |q: &QuestionId| !busy.contains(q) && *q != current;
        let free = |q: &QuestionId| !busy.contains(q);
        let different = |q: &QuestionId| *q != current;
        let tiers: [&dyn Fn(&QuestionId) -> bool; 5] =
            [&fresh, &free_other, &free, &different, &|_: &QuestionId| true];

        for (tier, accept) in tiers.iter().enumerate() {
            let candidates: Vec<QuestionId> =
                self.pool.iter().copied().filter(|q| accept(q)).collect();
            if let Some(&pick) = rng.choose(&candidates) {
                if tier >= 3 {
                    warn!(target: "assignment", site = ?key, question = %pick, "pool too small; question duplicated across sites");
                }
                return Some(pick);
            }
        }
        None
    }
}
