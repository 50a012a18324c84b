//! Match-game state machine.
//!
//! Two teams take turns opening face-down cards. Each card hides a
//! free-answer question; a correct answer flips the card and scores its
//! remaining points, and two face-up cards with the same face form a pair.
//!
//! ## Turn flow
//!
//! ```text
//! AwaitingFlip -> QuestionOpen -> correct -> (match?) -> ContinueChoice | TurnSwitch
//!                              -> wrong   -> TurnSwitch
//!                              -> closed  -> AwaitingFlip (attempt refunded)
//! ```
//!
//! A turn allows `attempts_per_turn` openings. After a correct first
//! attempt the continue-or-end choice is offered once `continue_delay_ms`
//! of host time has passed, unless a card was opened in the meantime.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::card::{card_rows, Card, MatchPlayer};
use crate::assignment::{AssignmentEngine, Verdict};
use crate::core::{
    ActionError, GameRng, GameRngState, GameTimer, MatchConfig, PlayerId, PlayerMap, RestoreError,
    Scheduler,
};
use crate::deck::shuffle;
use crate::questions::{Question, QuestionKind, QuestionPool};
use crate::rules::{GameEvent, GameMachine, GameResult, Phase};

/// Deferred continuations of the match game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deferred {
    /// Lift the click guard set when a card opened.
    ReleaseClick { click: u64 },
    /// Offer the continue choice for the turn with this serial.
    OfferContinue { turn: u64 },
}

/// Where the current turn stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStage {
    /// Waiting for a card click.
    AwaitingFlip,
    /// A card's question is on screen.
    QuestionOpen {
        /// Table index of the open card.
        card: usize,
    },
    /// Correct answer given; the continue choice is still on its delay.
    Resolved,
    /// The continue-or-end choice is on screen.
    ContinueChoice,
}

/// Builder for [`MatchGame`].
#[derive(Clone, Debug, Default)]
pub struct MatchGameBuilder {
    config: MatchConfig,
    pool: Option<QuestionPool>,
}

impl MatchGameBuilder {
    /// Start from the default configuration and the built-in questions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom configuration.
    #[must_use]
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a loaded question pool.
    #[must_use]
    pub fn questions(mut self, pool: QuestionPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Build a game waiting for team names.
    #[must_use]
    pub fn build(self, seed: u64) -> MatchGame {
        let pool = self
            .pool
            .unwrap_or_else(|| QuestionPool::fallback(QuestionKind::FreeAnswer));
        MatchGame::new(self.config, pool, GameRng::new(seed))
    }
}

/// The memory match game.
#[derive(Clone, Debug)]
pub struct MatchGame {
    config: MatchConfig,
    pool: QuestionPool,
    rng: GameRng,
    phase: Phase,
    paused: bool,
    cards: Vec<Card>,
    card_points: Vec<u32>,
    opened: Vec<usize>,
    matched_pairs: u32,
    players: PlayerMap<MatchPlayer>,
    current: PlayerId,
    total_attempts: u32,
    turn_attempts: u32,
    turn_serial: u64,
    open_card: Option<usize>,
    continue_choice: bool,
    awaiting_continue: bool,
    processing: bool,
    click_serial: u64,
    result: Option<GameResult>,
    timer: GameTimer,
    sites: AssignmentEngine<usize>,
    scheduler: Scheduler<Deferred>,
    events: Vec<GameEvent>,
    session: u64,
    revision: u64,
}

impl MatchGame {
    /// Create a game waiting for team names.
    pub fn new(config: MatchConfig, pool: QuestionPool, mut rng: GameRng) -> Self {
        let sites = AssignmentEngine::new(pool.ids(), &mut rng);
        let players = PlayerMap::new(2, |p| MatchPlayer::new(config.player_names[p.index()].clone()));
        let mut game = Self {
            config,
            pool,
            rng,
            phase: Phase::NameInput,
            paused: false,
            cards: Vec::new(),
            card_points: Vec::new(),
            opened: Vec::new(),
            matched_pairs: 0,
            players,
            current: PlayerId::new(0),
            total_attempts: 0,
            turn_attempts: 0,
            turn_serial: 0,
            open_card: None,
            continue_choice: false,
            awaiting_continue: false,
            processing: false,
            click_serial: 0,
            result: None,
            timer: GameTimer::new(),
            sites,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            session: GameRng::from_entropy().seed(),
            revision: 0,
        };
        game.deal();
        game
    }

    // === Queries ===

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Loaded questions.
    #[must_use]
    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    /// Cards in table order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card index ranges per display row.
    #[must_use]
    pub fn card_rows(&self) -> Vec<std::ops::Range<usize>> {
        card_rows(self.cards.len())
    }

    /// Points a card would currently award.
    #[must_use]
    pub fn card_points(&self, card: usize) -> Option<u32> {
        self.card_points.get(card).copied()
    }

    /// Face-up cards, in the order they were flipped.
    #[must_use]
    pub fn opened_cards(&self) -> &[usize] {
        &self.opened
    }

    /// Pairs completed so far.
    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    /// A player's record.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&MatchPlayer> {
        self.players.get(player)
    }

    /// Both players' records.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<MatchPlayer> {
        &self.players
    }

    /// Questions answered by anyone this game.
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    /// Cards opened in the current turn.
    #[must_use]
    pub fn turn_attempts(&self) -> u32 {
        self.turn_attempts
    }

    /// Whether play is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the click guard is up.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Elapsed game time.
    #[must_use]
    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    /// Question assignment state per card.
    #[must_use]
    pub fn sites(&self) -> &AssignmentEngine<usize> {
        &self.sites
    }

    /// Sub-state of the current turn.
    #[must_use]
    pub fn turn_stage(&self) -> TurnStage {
        if let Some(card) = self.open_card {
            TurnStage::QuestionOpen { card }
        } else if self.continue_choice {
            TurnStage::ContinueChoice
        } else if self.awaiting_continue {
            TurnStage::Resolved
        } else {
            TurnStage::AwaitingFlip
        }
    }

    /// Card whose question is open.
    #[must_use]
    pub fn open_card(&self) -> Option<usize> {
        self.open_card
    }

    /// Question of the open card.
    #[must_use]
    pub fn open_question(&self) -> Option<&Question> {
        let card = self.open_card?;
        let id = self.sites.question_at(&card)?;
        self.pool.get_by_id(id)
    }

    /// Whether the continue-or-end choice is on screen.
    #[must_use]
    pub fn continue_offered(&self) -> bool {
        self.continue_choice
    }

    /// Answer-character indices revealed for a card.
    #[must_use]
    pub fn revealed_clues(&self, card: usize) -> Vec<usize> {
        self.sites
            .site(&card)
            .map(|s| s.revealed.to_vec())
            .unwrap_or_default()
    }

    /// Wrong answers given on a card since its question was assigned.
    #[must_use]
    pub fn wrong_count(&self, card: usize) -> u32 {
        self.sites.wrong_attempts(&card)
    }

    // === Lifecycle ===

    /// Set the team names and start play.
    pub fn set_player_names(&mut self, first: impl Into<String>, second: impl Into<String>) {
        self.players[PlayerId::new(0)].name = first.into();
        self.players[PlayerId::new(1)].name = second.into();
        self.start();
    }

    /// Start a fresh game with the current names.
    pub fn start(&mut self) {
        self.deal();
        self.phase = Phase::Playing;
        self.timer.start();
        self.events.push(GameEvent::GameStarted);
        info!(target: "match_game", cards = self.cards.len(), "game started");
        self.commit();
    }

    /// Deal a new table and play again with the same names.
    pub fn reset(&mut self) {
        self.start();
    }

    /// Clear the table and go back to name entry.
    pub fn reset_to_name_input(&mut self) {
        self.deal();
        self.phase = Phase::NameInput;
        debug!(target: "match_game", "back to name input");
        self.commit();
    }

    fn deal(&mut self) {
        self.scheduler.cancel_all();
        self.timer.reset();

        let mut faces: Vec<u32> = (1..=self.config.pairs).flat_map(|f| [f, f]).collect();
        shuffle(&mut self.rng, &mut faces);
        self.cards = faces.into_iter().map(Card::new).collect();
        self.card_points = vec![self.config.card_points; self.cards.len()];
        self.opened.clear();
        self.matched_pairs = 0;
        for (_, player) in self.players.iter_mut() {
            player.clear();
        }
        self.sites.reset(&mut self.rng);

        self.current = PlayerId::new(0);
        self.total_attempts = 0;
        self.result = None;
        self.paused = false;
        self.clear_turn();
    }

    fn clear_turn(&mut self) {
        self.turn_attempts = 0;
        self.open_card = None;
        self.continue_choice = false;
        self.awaiting_continue = false;
        self.processing = false;
        self.turn_serial += 1;
    }

    fn commit(&mut self) {
        self.revision += 1;
    }

    fn ensure_active(&self) -> Result<(), ActionError> {
        if self.phase != Phase::Playing || self.paused {
            return Err(ActionError::NotPlaying);
        }
        Ok(())
    }

    // === Turn inputs ===

    /// Open a card's question.
    ///
    /// The question is assigned lazily on first open and counts as asked.
    pub fn click_card(&mut self, card: usize) -> Result<Question, ActionError> {
        self.ensure_active()?;
        if self.processing {
            return Err(ActionError::InputLocked);
        }
        if self.open_card.is_some() || self.continue_choice {
            return Err(ActionError::PromptOpen);
        }
        if self.turn_attempts >= self.config.attempts_per_turn {
            return Err(ActionError::TurnExhausted);
        }
        let state = self.cards.get(card).ok_or(ActionError::InvalidCard(card))?;
        if !state.is_available() {
            return Err(ActionError::CardUnavailable(card));
        }

        let id = self
            .sites
            .ensure(&card, &mut self.rng)
            .ok_or(ActionError::NoOpenQuestion)?;
        let question = self
            .pool
            .get_by_id(id)
            .cloned()
            .ok_or(ActionError::NoOpenQuestion)?;
        self.sites.mark_asked(&card);

        self.processing = true;
        self.click_serial += 1;
        self.scheduler.schedule(
            self.config.click_debounce_ms,
            Deferred::ReleaseClick {
                click: self.click_serial,
            },
        );
        self.turn_attempts += 1;
        self.open_card = Some(card);
        self.events.push(GameEvent::CardOpened { card });
        debug!(target: "match_game", card, question = %id, player = %self.current, "card opened");
        self.commit();
        Ok(question)
    }

    /// Reveal one hidden answer character of the open card, for a point
    /// penalty on that card. `Ok(None)` when nothing is left to reveal.
    pub fn reveal_clue(&mut self) -> Result<Option<usize>, ActionError> {
        self.ensure_active()?;
        let card = self.open_card.ok_or(ActionError::NoOpenQuestion)?;
        let site = self.sites.site(&card).ok_or(ActionError::NoOpenQuestion)?;
        if site.revealed.len() >= self.config.max_clues {
            return Ok(None);
        }
        let answer = self
            .pool
            .get_by_id(site.question)
            .and_then(Question::answer)
            .unwrap_or_default();
        let hidden: Vec<usize> = answer
            .chars()
            .enumerate()
            .filter(|(i, c)| c.is_ascii_alphanumeric() && !site.revealed.contains(i))
            .map(|(i, _)| i)
            .collect();
        let Some(&index) = self.rng.choose(&hidden) else {
            return Ok(None);
        };

        self.sites.record_reveal(&card, index, self.config.max_clues);
        if let Some(points) = self.card_points.get_mut(card) {
            *points = points.saturating_sub(self.config.clue_penalty);
        }
        self.events.push(GameEvent::ClueRevealed { card, index });
        debug!(target: "match_game", card, index, "clue revealed");
        self.commit();
        Ok(Some(index))
    }

    /// Judge the open question as right or wrong.
    pub fn answer(&mut self, correct: bool) -> Result<(), ActionError> {
        if correct {
            self.answer_correct()
        } else {
            self.answer_wrong()
        }
    }

    /// The open question was answered correctly.
    pub fn answer_correct(&mut self) -> Result<(), ActionError> {
        self.ensure_active()?;
        let card = self.open_card.take().ok_or(ActionError::NoOpenQuestion)?;
        let player = self.current;
        self.processing = false;
        self.count_attempt(player);

        let gained = self.card_points.get_mut(card).map_or(0, std::mem::take);
        self.players[player].points += gained;
        self.cards[card].flipped = true;
        self.sites.remove(&card);

        let face = self.cards[card].face;
        let twin = self
            .opened
            .iter()
            .copied()
            .find(|&other| self.cards[other].face == face && !self.cards[other].matched);
        self.opened.push(card);

        match twin {
            Some(other) => {
                self.cards[card].matched = true;
                self.cards[other].matched = true;
                self.matched_pairs += 1;
                let scorer = &mut self.players[player];
                scorer.matches += 1;
                scorer.points += self.config.match_bonus;
                self.events.push(GameEvent::PointGain {
                    player,
                    amount: gained + self.config.match_bonus,
                });
                self.events.push(GameEvent::MatchFound {
                    player,
                    cards: (other, card),
                });
                info!(target: "match_game", %player, pair = face, matched = self.matched_pairs, "pair matched");
            }
            None if gained > 0 => {
                self.events.push(GameEvent::PointGain {
                    player,
                    amount: gained,
                });
            }
            None => {}
        }

        if self.matched_pairs >= self.config.pairs {
            self.complete();
        } else if self.turn_attempts >= self.config.attempts_per_turn {
            self.switch_player();
        } else {
            self.awaiting_continue = true;
            self.scheduler.schedule(
                self.config.continue_delay_ms,
                Deferred::OfferContinue {
                    turn: self.turn_serial,
                },
            );
        }
        self.commit();
        Ok(())
    }

    /// The open question was answered wrongly. The turn always passes.
    pub fn answer_wrong(&mut self) -> Result<(), ActionError> {
        self.ensure_active()?;
        let card = self.open_card.take().ok_or(ActionError::NoOpenQuestion)?;
        let player = self.current;
        self.count_attempt(player);

        let rotation = self.sites.judge(
            &card,
            Verdict::Wrong(None),
            self.config.rotation(),
            &mut self.rng,
        );
        if let Some(rotation) = rotation {
            debug!(target: "match_game", card, from = %rotation.from, to = %rotation.to, "card question rotated");
        }
        self.events.push(GameEvent::WrongAnswer { player, card });
        self.switch_player();
        self.commit();
        Ok(())
    }

    /// Close the open question without answering; the attempt is refunded.
    pub fn close_question(&mut self) -> Result<(), ActionError> {
        self.open_card.take().ok_or(ActionError::NoOpenQuestion)?;
        self.turn_attempts = self.turn_attempts.saturating_sub(1);
        self.processing = false;
        self.commit();
        Ok(())
    }

    /// Keep the turn and open another card.
    pub fn continue_turn(&mut self) -> Result<(), ActionError> {
        self.ensure_active()?;
        if !self.continue_choice {
            return Err(ActionError::NoChoicePending);
        }
        self.continue_choice = false;
        self.commit();
        Ok(())
    }

    /// Give the turn to the other team.
    pub fn end_turn(&mut self) -> Result<(), ActionError> {
        self.ensure_active()?;
        if !self.continue_choice {
            return Err(ActionError::NoChoicePending);
        }
        self.switch_player();
        self.commit();
        Ok(())
    }

    fn count_attempt(&mut self, player: PlayerId) {
        self.total_attempts += 1;
        self.players[player].attempts += 1;
    }

    fn switch_player(&mut self) {
        self.current = PlayerId::new((self.current.0 + 1) % 2);
        self.clear_turn();
        self.events.push(GameEvent::TurnPassed {
            player: self.current,
        });
        debug!(target: "match_game", player = %self.current, "turn passed");
    }

    // === Pause and forced end ===

    /// Pause play. Any open question is closed and its attempt refunded.
    pub fn pause(&mut self) -> Result<(), ActionError> {
        self.ensure_active()?;
        if self.open_card.take().is_some() {
            self.turn_attempts = self.turn_attempts.saturating_sub(1);
        }
        self.processing = false;
        self.paused = true;
        self.timer.set_paused(true);
        self.events.push(GameEvent::Paused);
        self.commit();
        Ok(())
    }

    /// Resume a paused game.
    pub fn resume(&mut self) -> Result<(), ActionError> {
        if self.phase != Phase::Playing || !self.paused {
            return Err(ActionError::NotPlaying);
        }
        self.paused = false;
        self.timer.set_paused(false);
        self.events.push(GameEvent::Resumed);
        self.commit();
        Ok(())
    }

    /// End the game now and score it as it stands.
    pub fn force_finish(&mut self) -> Result<(), ActionError> {
        if self.phase != Phase::Playing {
            return Err(ActionError::NotPlaying);
        }
        self.complete();
        self.commit();
        Ok(())
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        self.paused = false;
        self.timer.stop();
        self.scheduler.cancel_all();
        self.clear_turn();

        let result = decide_winner(&self.players);
        info!(target: "match_game", ?result, secs = self.timer.elapsed_secs(), "game completed");
        self.events.push(GameEvent::GameFinished(result.clone()));
        self.result = Some(result);
    }

    fn run_deferred(&mut self, action: Deferred) -> bool {
        match action {
            Deferred::ReleaseClick { click } => {
                if click != self.click_serial {
                    return false;
                }
                let changed = self.processing;
                self.processing = false;
                changed
            }
            Deferred::OfferContinue { turn } => {
                if self.phase != Phase::Playing
                    || turn != self.turn_serial
                    || !self.awaiting_continue
                    || self.open_card.is_some()
                {
                    self.awaiting_continue = false;
                    return false;
                }
                if self.paused {
                    self.scheduler.schedule(0, action);
                    return false;
                }
                self.awaiting_continue = false;
                self.continue_choice = true;
                self.events.push(GameEvent::ContinueOffered {
                    player: self.current,
                });
                true
            }
        }
    }
}

/// Highest points wins; equal points fall back to matches, then a tie.
fn decide_winner(players: &PlayerMap<MatchPlayer>) -> GameResult {
    let a = &players[PlayerId::new(0)];
    let b = &players[PlayerId::new(1)];
    match (a.points, a.matches).cmp(&(b.points, b.matches)) {
        std::cmp::Ordering::Greater => GameResult::Winner(PlayerId::new(0)),
        std::cmp::Ordering::Less => GameResult::Winner(PlayerId::new(1)),
        std::cmp::Ordering::Equal => GameResult::Tie,
    }
}

/// Everything needed to rebuild a [`MatchGame`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub config: MatchConfig,
    pub pool: QuestionPool,
    pub rng: GameRngState,
    pub phase: Phase,
    pub paused: bool,
    pub cards: Vec<Card>,
    pub card_points: Vec<u32>,
    pub opened: Vec<usize>,
    pub matched_pairs: u32,
    pub players: Vec<MatchPlayer>,
    pub current: PlayerId,
    pub total_attempts: u32,
    pub turn_attempts: u32,
    pub turn_serial: u64,
    pub open_card: Option<usize>,
    pub continue_choice: bool,
    pub awaiting_continue: bool,
    pub result: Option<GameResult>,
    pub timer: GameTimer,
    pub sites: AssignmentEngine<usize>,
    pub session: u64,
    pub revision: u64,
}

impl GameMachine for MatchGame {
    type Snapshot = MatchSnapshot;

    const GAME_TAG: &'static str = "match-game";

    fn phase(&self) -> Phase {
        self.phase
    }

    fn current_player(&self) -> Option<PlayerId> {
        (self.phase == Phase::Playing).then_some(self.current)
    }

    fn result(&self) -> Option<GameResult> {
        self.result.clone()
    }

    fn advance_time(&mut self, ms: u64) {
        let mut changed = self.timer.advance(ms) > 0;
        for action in self.scheduler.advance(ms) {
            changed |= self.run_deferred(action);
        }
        if changed {
            self.commit();
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn session(&self) -> u64 {
        self.session
    }

    fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            config: self.config.clone(),
            pool: self.pool.clone(),
            rng: self.rng.state(),
            phase: self.phase,
            paused: self.paused,
            cards: self.cards.clone(),
            card_points: self.card_points.clone(),
            opened: self.opened.clone(),
            matched_pairs: self.matched_pairs,
            players: self.players.iter().map(|(_, p)| p.clone()).collect(),
            current: self.current,
            total_attempts: self.total_attempts,
            turn_attempts: self.turn_attempts,
            turn_serial: self.turn_serial,
            open_card: self.open_card,
            continue_choice: self.continue_choice,
            awaiting_continue: self.awaiting_continue,
            result: self.result.clone(),
            timer: self.timer.clone(),
            sites: self.sites.clone(),
            session: self.session,
            revision: self.revision,
        }
    }

    fn restore(snapshot: MatchSnapshot) -> Result<Self, RestoreError> {
        validate(&snapshot)?;
        let MatchSnapshot {
            config,
            pool,
            rng,
            phase,
            paused,
            cards,
            card_points,
            opened,
            matched_pairs,
            players,
            current,
            total_attempts,
            turn_attempts,
            turn_serial,
            open_card,
            continue_choice,
            awaiting_continue,
            result,
            timer,
            sites,
            session,
            revision,
        } = snapshot;

        let players = PlayerMap::from_vec(players)
            .ok_or_else(|| RestoreError::Inconsistent("no players".to_string()))?;

        let mut game = Self {
            config,
            pool,
            rng: GameRng::from_state(&rng),
            phase,
            paused,
            cards,
            card_points,
            opened,
            matched_pairs,
            players,
            current,
            total_attempts,
            turn_attempts,
            turn_serial,
            open_card,
            continue_choice,
            awaiting_continue,
            processing: false,
            click_serial: 0,
            result,
            timer,
            sites,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            session,
            revision,
        };
        // The delay restarts from zero; the offer itself is re-checked when it fires.
        if game.awaiting_continue && game.phase == Phase::Playing {
            game.scheduler.schedule(
                game.config.continue_delay_ms,
                Deferred::OfferContinue {
                    turn: game.turn_serial,
                },
            );
        }
        Ok(game)
    }
}

/// Reject snapshots whose indices or counts disagree with each other.
fn validate(snapshot: &MatchSnapshot) -> Result<(), RestoreError> {
    let config = &snapshot.config;
    let card_count = config.card_count();
    RestoreError::require(snapshot.players.len() == 2, "match game needs two players")?;
    RestoreError::require(snapshot.current.index() < 2, "current player out of range")?;
    RestoreError::require(snapshot.cards.len() == card_count, "card count")?;
    RestoreError::require(snapshot.card_points.len() == card_count, "card points count")?;
    RestoreError::require(
        snapshot.cards.iter().all(|c| (1..=config.pairs).contains(&c.face)),
        "card face out of range",
    )?;
    RestoreError::require(
        snapshot.open_card.map_or(true, |c| c < card_count),
        "open card out of range",
    )?;
    RestoreError::require(
        snapshot.opened.iter().all(|&c| c < card_count),
        "opened card out of range",
    )?;
    RestoreError::require(
        snapshot.sites.sites().all(|(&c, _)| c < card_count),
        "question site out of range",
    )?;
    RestoreError::require(snapshot.matched_pairs <= config.pairs, "matched pairs")?;
    RestoreError::require(
        snapshot.turn_attempts <= config.attempts_per_turn,
        "turn attempts",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u64) -> MatchGame {
        let mut game = MatchGameBuilder::new().build(seed);
        game.set_player_names("Merah", "Biru");
        game.drain_events();
        game
    }

    fn pair_of(game: &MatchGame, face: u32) -> (usize, usize) {
        let cards: Vec<usize> = game
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.face == face)
            .map(|(i, _)| i)
            .collect();
        (cards[0], cards[1])
    }

    fn non_matching(game: &MatchGame) -> (usize, usize) {
        let first = 0;
        let face = game.cards()[first].face;
        let second = (1..game.cards().len())
            .find(|&i| game.cards()[i].face != face)
            .unwrap();
        (first, second)
    }

    #[test]
    fn test_start_deals_pairs() {
        let game = started(1);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.cards().len(), 14);
        for face in 1..=7 {
            assert_eq!(game.cards().iter().filter(|c| c.face == face).count(), 2);
        }
        assert!((0..14).all(|i| game.card_points(i) == Some(100)));
        assert_eq!(game.player(PlayerId::new(0)).unwrap().name, "Merah");
        assert_eq!(game.current_player(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_click_requires_playing() {
        let mut game = MatchGameBuilder::new().build(2);
        assert_eq!(game.click_card(0), Err(ActionError::NotPlaying));
    }

    #[test]
    fn test_click_guards() {
        let mut game = started(3);
        game.click_card(0).unwrap();
        assert_eq!(game.turn_attempts(), 1);
        assert_eq!(game.click_card(1), Err(ActionError::InputLocked));

        game.advance_time(500);
        assert_eq!(game.click_card(1), Err(ActionError::PromptOpen));
        assert_eq!(game.click_card(99).unwrap_err(), ActionError::PromptOpen);

        game.close_question().unwrap();
        assert_eq!(game.turn_attempts(), 0);
        assert_eq!(game.click_card(99), Err(ActionError::InvalidCard(99)));
    }

    #[test]
    fn test_matching_pair_scores_three_hundred() {
        let mut game = started(4);
        let (a, b) = pair_of(&game, 1);

        game.click_card(a).unwrap();
        game.answer_correct().unwrap();
        game.click_card(b).unwrap();
        game.answer_correct().unwrap();

        let p1 = game.player(PlayerId::new(0)).unwrap();
        assert_eq!(p1.points, 300);
        assert_eq!(p1.matches, 1);
        assert_eq!(game.matched_pairs(), 1);
        assert!(game.cards()[a].matched && game.cards()[b].matched);
        // Second attempt of the turn: the turn passes.
        assert_eq!(game.current_player(), Some(PlayerId::new(1)));

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::PointGain {
            player: PlayerId::new(0),
            amount: 200
        }));
    }

    #[test]
    fn test_continue_choice_after_delay() {
        let mut game = started(5);
        game.click_card(0).unwrap();
        game.answer_correct().unwrap();
        assert_eq!(game.turn_stage(), TurnStage::Resolved);

        game.advance_time(999);
        assert!(!game.continue_offered());
        game.advance_time(1);
        assert!(game.continue_offered());
        assert_eq!(game.click_card(1), Err(ActionError::PromptOpen));

        game.end_turn().unwrap();
        assert_eq!(game.current_player(), Some(PlayerId::new(1)));
        assert_eq!(game.turn_attempts(), 0);
    }

    #[test]
    fn test_continue_offer_skipped_when_card_opened() {
        let mut game = started(6);
        let (a, b) = non_matching(&game);
        game.click_card(a).unwrap();
        game.answer_correct().unwrap();
        game.click_card(b).unwrap();
        game.advance_time(2000);
        assert!(!game.continue_offered());
        assert_eq!(game.open_card(), Some(b));
    }

    #[test]
    fn test_continue_turn_keeps_player() {
        let mut game = started(7);
        let (a, b) = non_matching(&game);
        game.click_card(a).unwrap();
        game.answer_correct().unwrap();
        game.advance_time(1000);
        game.continue_turn().unwrap();
        game.click_card(b).unwrap();
        assert_eq!(game.current_player(), Some(PlayerId::new(0)));
        assert_eq!(game.turn_attempts(), 2);
    }

    #[test]
    fn test_wrong_answers_alternate_players() {
        let mut game = started(8);
        for expected_next in [1u8, 0, 1] {
            game.click_card(0).unwrap();
            game.answer_wrong().unwrap();
            assert_eq!(game.current_player(), Some(PlayerId::new(expected_next)));
            assert!(!game.continue_offered());
        }
        assert_eq!(game.total_attempts(), 3);
        // Third wrong answer rotated the card's question.
        assert_eq!(game.wrong_count(0), 0);
    }

    #[test]
    fn test_reveal_clue_costs_points() {
        let mut game = started(9);
        game.click_card(2).unwrap();
        let first = game.reveal_clue().unwrap();
        assert!(first.is_some());
        assert_eq!(game.card_points(2), Some(80));
        game.reveal_clue().unwrap();
        assert_eq!(game.card_points(2), Some(60));
        assert_eq!(game.reveal_clue().unwrap(), None);
        assert_eq!(game.card_points(2), Some(60));
        assert_eq!(game.revealed_clues(2).len(), 2);

        game.answer_correct().unwrap();
        assert_eq!(game.player(PlayerId::new(0)).unwrap().points, 60);
        assert_eq!(game.card_points(2), Some(0));
    }

    #[test]
    fn test_pause_closes_question() {
        let mut game = started(10);
        game.click_card(0).unwrap();
        game.pause().unwrap();
        assert!(game.is_paused());
        assert_eq!(game.open_card(), None);
        assert_eq!(game.turn_attempts(), 0);
        assert_eq!(game.click_card(1), Err(ActionError::NotPlaying));

        game.advance_time(5000);
        assert_eq!(game.timer().elapsed_secs(), 0);
        game.resume().unwrap();
        game.advance_time(2000);
        assert_eq!(game.timer().elapsed_secs(), 2);
    }

    #[test]
    fn test_force_finish_scores_tie() {
        let mut game = started(11);
        game.force_finish().unwrap();
        assert_eq!(game.phase(), Phase::Completed);
        assert_eq!(game.result(), Some(GameResult::Tie));
        assert!(!game.timer().is_running());
        assert_eq!(game.force_finish(), Err(ActionError::NotPlaying));
    }

    #[test]
    fn test_tie_broken_by_matches() {
        let mut players = PlayerMap::new(2, |_| MatchPlayer::new("x"));
        players[PlayerId::new(0)].points = 300;
        players[PlayerId::new(1)].points = 300;
        players[PlayerId::new(1)].matches = 1;
        assert_eq!(decide_winner(&players), GameResult::Winner(PlayerId::new(1)));
    }

    #[test]
    fn test_full_game_completes() {
        let mut game = started(12);
        for face in 1..=7 {
            let (a, b) = pair_of(&game, face);
            for card in [a, b] {
                game.advance_time(1000);
                if game.continue_offered() {
                    game.continue_turn().unwrap();
                }
                game.click_card(card).unwrap();
                game.answer_correct().unwrap();
            }
        }
        assert_eq!(game.phase(), Phase::Completed);
        assert_eq!(game.matched_pairs(), 7);
        assert!(game.result().is_some());
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameFinished(_))));
    }

    #[test]
    fn test_reset_to_name_input() {
        let mut game = started(13);
        game.click_card(0).unwrap();
        game.reset_to_name_input();
        assert_eq!(game.phase(), Phase::NameInput);
        assert_eq!(game.open_card(), None);
        assert_eq!(game.sites().site_count(), 0);
    }

    #[test]
    fn test_revision_tracks_commits() {
        let mut game = started(14);
        let before = game.revision();
        assert!(game.click_card(99).is_err());
        assert_eq!(game.revision(), before);
        game.click_card(0).unwrap();
        assert!(game.revision() > before);
    }

    #[test]
    fn test_snapshot_roundtrip_rearms_continue() {
        let mut game = started(15);
        game.click_card(0).unwrap();
        game.answer_correct().unwrap();

        let snapshot = game.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: MatchSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);

        let mut restored = MatchGame::restore(back).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.session(), game.session());
        restored.advance_time(1000);
        assert!(restored.continue_offered());
    }

    #[test]
    fn test_separate_games_have_separate_sessions() {
        let a = started(16);
        let b = started(16);
        assert_ne!(a.session(), b.session());
        assert_eq!(a.revision(), b.revision());
    }

    #[test]
    fn test_restore_rejects_inconsistent_snapshots() {
        let mut game = started(17);
        game.click_card(4).unwrap();
        let good = game.snapshot();
        assert!(MatchGame::restore(good.clone()).is_ok());

        let mut bad = good.clone();
        bad.current = PlayerId::new(4);
        assert!(matches!(
            MatchGame::restore(bad),
            Err(RestoreError::Inconsistent(_))
        ));

        let mut bad = good.clone();
        bad.open_card = Some(14);
        assert!(MatchGame::restore(bad).is_err());

        let mut bad = good.clone();
        bad.players.pop();
        assert!(MatchGame::restore(bad).is_err());

        let mut bad = good.clone();
        bad.card_points.push(100);
        assert!(MatchGame::restore(bad).is_err());

        let mut bad = good.clone();
        bad.opened.push(20);
        assert!(MatchGame::restore(bad).is_err());

        let mut bad = good;
        bad.cards[0].face = 8;
        assert!(MatchGame::restore(bad).is_err());
    }

    #[test]
    fn test_stale_debounce_keeps_new_click_locked() {
        let mut game = started(18);
        game.click_card(0).unwrap();
        game.advance_time(300);
        game.close_question().unwrap();
        game.click_card(1).unwrap();
        assert!(game.is_processing());

        // The first click's release comes due here.
        game.advance_time(300);
        assert!(game.is_processing());

        game.advance_time(200);
        assert!(!game.is_processing());
    }
}
