//! Snakes & ladders with quiz challenges.
//!
//! A game master moves three teams by hand: select a player, set the step
//! count, advance. Moves run these hooks in order:
//!
//! 1. pre-move checkpoint scan along the path
//! 2. the move itself, clamped to the final cell
//! 3. finish check and ranking
//! 4. post-move marker check on the destination (skipped if a checkpoint fired)
//! 5. turn handoff, unless a challenge is now open
//!
//! A correct answer earns the answerer a reward (a shield, or a shot that
//! pushes another team back); the turn hands off once it is claimed.

use im::OrdSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::layout::{BoardLayout, ChallengeKind};
use crate::assignment::{AssignmentEngine, Verdict};
use crate::core::{
    ActionError, BoardConfig, GameRng, GameRngState, PlayerId, PlayerMap, RestoreError,
};
use crate::questions::{Question, QuestionKind, QuestionPool};
use crate::rules::{GameEvent, GameMachine, GameResult, Phase};

/// A team on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPlayer {
    pub name: String,
    /// Current cell, starting at 1.
    pub position: u32,
    pub finished: bool,
    /// 1-based finishing rank once finished.
    pub rank: Option<u32>,
    /// Shields held; each absorbs one shot.
    pub shield: u32,
}

impl BoardPlayer {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 1,
            finished: false,
            rank: None,
            shield: 0,
        }
    }

    fn clear(&mut self) {
        self.position = 1;
        self.finished = false;
        self.rank = None;
        self.shield = 0;
    }
}

/// An open challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Cell whose question is posed.
    pub cell: u32,
    pub kind: ChallengeKind,
    /// Player who landed on or crossed the cell.
    pub lander: PlayerId,
    /// Player committed to answering; unset on an optional cell until decided.
    pub answerer: Option<PlayerId>,
}

/// A reward waiting to be claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReward {
    /// Player who answered correctly.
    pub player: PlayerId,
    /// Player whose turn it was; the handoff starts after them.
    pub lander: PlayerId,
}

/// How a reward is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardChoice {
    /// Gain one shield.
    Shield,
    /// Push another team back, or break its shield.
    Shoot(PlayerId),
}

/// Summary of one `advance_selected` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub player: PlayerId,
    pub from: u32,
    pub to: u32,
    /// Rank assigned if the move reached the final cell.
    pub rank: Option<u32>,
    /// Challenge opened by the move, if any.
    pub challenge: Option<ChallengeKind>,
}

/// Builder for [`BoardGame`].
#[derive(Clone, Debug, Default)]
pub struct BoardGameBuilder {
    config: BoardConfig,
    pool: Option<QuestionPool>,
}

impl BoardGameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn questions(mut self, pool: QuestionPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Build a board waiting for team names. Falls back to the built-in
    /// multiple-choice questions when no pool was given.
    #[must_use]
    pub fn build(self, seed: u64) -> BoardGame {
        let pool = self
            .pool
            .unwrap_or_else(|| QuestionPool::fallback(QuestionKind::MultipleChoice));
        BoardGame::new(self.config, pool, GameRng::new(seed))
    }
}

/// The snakes & ladders board.
#[derive(Clone, Debug)]
pub struct BoardGame {
    config: BoardConfig,
    pool: QuestionPool,
    rng: GameRng,
    phase: Phase,
    players: PlayerMap<BoardPlayer>,
    selected: Option<PlayerId>,
    steps: u32,
    layout: BoardLayout,
    visited: PlayerMap<OrdSet<u32>>,
    sites: AssignmentEngine<u32>,
    challenge: Option<Challenge>,
    reward: Option<PendingReward>,
    next_rank: u32,
    ranking: Vec<PlayerId>,
    events: Vec<GameEvent>,
    session: u64,
    revision: u64,
}

impl BoardGame {
    /// Create a board with a fresh layout, waiting for team names.
    pub fn new(config: BoardConfig, pool: QuestionPool, mut rng: GameRng) -> Self {
        let layout = BoardLayout::generate(config.size, config.extra_marker_divisor, &mut rng);
        let sites = AssignmentEngine::new(pool.ids(), &mut rng);
        let count = config.player_names.len();
        let players = PlayerMap::new(count, |p| BoardPlayer::new(config.player_names[p.index()].clone()));
        let mut game = Self {
            steps: config.min_steps,
            config,
            pool,
            rng,
            phase: Phase::NameInput,
            players,
            selected: None,
            layout,
            visited: PlayerMap::new(count, |_| OrdSet::new()),
            sites,
            challenge: None,
            reward: None,
            next_rank: 1,
            ranking: Vec::new(),
            events: Vec::new(),
            session: GameRng::from_entropy().seed(),
            revision: 0,
        };
        game.assign_questions();
        game
    }

    fn assign_questions(&mut self) {
        let cells = self.layout.challenge_cells();
        self.sites.assign_initial(&cells, &mut self.rng);
    }

    fn commit(&mut self) {
        self.revision += 1;
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.phase != Phase::Playing {
            return Err(ActionError::NotPlaying);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        if self.challenge.is_some() || self.reward.is_some() {
            return Err(ActionError::PromptOpen);
        }
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    #[must_use]
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<BoardPlayer> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&BoardPlayer> {
        self.players.get(player)
    }

    /// Player the game master has selected.
    #[must_use]
    pub fn selected_player(&self) -> Option<PlayerId> {
        self.selected
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    /// Question of the open challenge.
    #[must_use]
    pub fn challenge_question(&self) -> Option<&Question> {
        let cell = self.challenge?.cell;
        let id = self.sites.question_at(&cell)?;
        self.pool.get_by_id(id)
    }

    /// Options already ruled out for the open challenge.
    #[must_use]
    pub fn challenge_disabled_options(&self) -> Vec<usize> {
        self.challenge
            .map(|c| self.sites.disabled_options(&c.cell))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn pending_reward(&self) -> Option<&PendingReward> {
        self.reward.as_ref()
    }

    /// Checkpoints a player has already been challenged on.
    #[must_use]
    pub fn visited_checkpoints(&self, player: PlayerId) -> Vec<u32> {
        self.visited
            .get(player)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Question assignment state per cell.
    #[must_use]
    pub fn sites(&self) -> &AssignmentEngine<u32> {
        &self.sites
    }

    /// Finishing order so far.
    #[must_use]
    pub fn ranking(&self) -> &[PlayerId] {
        &self.ranking
    }

    /// Next unfinished player after `from` in table order, wrapping.
    #[must_use]
    pub fn next_active_player(&self, from: PlayerId) -> Option<PlayerId> {
        let count = self.players.player_count();
        (1..=count)
            .map(|step| PlayerId::new(((from.index() + step) % count) as u8))
            .find(|&p| !self.players[p].finished)
    }

    // === Lifecycle ===

    /// Set the three team names and start play with the first team selected.
    pub fn set_player_names(&mut self, names: [&str; 3]) {
        for (p, player) in self.players.iter_mut() {
            if let Some(name) = names.get(p.index()) {
                player.name = (*name).to_string();
            }
        }
        self.phase = Phase::Playing;
        self.selected = Some(PlayerId::new(0));
        self.events.push(GameEvent::GameStarted);
        info!(target: "board_game", size = self.layout.size(), markers = self.layout.markers().len(), "game started");
        self.commit();
    }

    /// Wipe the board: new layout, fresh questions, everyone back on cell 1,
    /// then wait for names again.
    pub fn confirm_reset(&mut self) {
        for (_, player) in self.players.iter_mut() {
            player.clear();
        }
        for (_, visited) in self.visited.iter_mut() {
            *visited = OrdSet::new();
        }
        self.selected = None;
        self.steps = self.config.min_steps;
        self.next_rank = 1;
        self.ranking.clear();
        self.challenge = None;
        self.reward = None;
        self.phase = Phase::NameInput;
        self.layout = BoardLayout::generate(
            self.config.size,
            self.config.extra_marker_divisor,
            &mut self.rng,
        );
        self.sites.reset(&mut self.rng);
        self.assign_questions();
        debug!(target: "board_game", "board reset");
        self.commit();
    }

    // === Game master inputs ===

    /// Select the team to move.
    pub fn select_player(&mut self, player: PlayerId) -> Result<(), ActionError> {
        self.ensure_idle()?;
        let state = self
            .players
            .get(player)
            .ok_or(ActionError::UnknownPlayer(player))?;
        if state.finished {
            return Err(ActionError::PlayerFinished(player));
        }
        self.selected = Some(player);
        self.commit();
        Ok(())
    }

    /// Set the step count, clamped to the allowed range.
    pub fn set_steps(&mut self, steps: u32) -> u32 {
        let clamped = steps.clamp(self.config.min_steps, self.config.max_steps);
        if clamped != self.steps {
            self.steps = clamped;
            self.commit();
        }
        self.steps
    }

    pub fn increment_steps(&mut self) -> u32 {
        self.set_steps(self.steps + 1)
    }

    pub fn decrement_steps(&mut self) -> u32 {
        self.set_steps(self.steps.saturating_sub(1))
    }

    /// Move the selected team by the current step count.
    pub fn advance_selected(&mut self) -> Result<MoveReport, ActionError> {
        self.ensure_idle()?;
        let player = self.selected.ok_or(ActionError::NotPlaying)?;
        if self.players[player].finished {
            return Err(ActionError::PlayerFinished(player));
        }

        let from = self.players[player].position;
        let to = (from + self.steps).min(self.layout.max_cell());
        let crossed = self.crossed_checkpoint(player, from, to);

        self.move_player(player, to);
        let rank = self.check_finish(player);

        let mut challenge = None;
        if rank.is_none() {
            let opened = match crossed {
                Some(cell) => self.trigger_checkpoint(player, cell)?,
                None => self.trigger_marker(player)?,
            };
            challenge = self.challenge.filter(|_| opened).map(|c| c.kind);
        }
        if challenge.is_none() && self.phase == Phase::Playing {
            self.hand_off(player);
        }

        self.commit();
        Ok(MoveReport {
            player,
            from,
            to,
            rank,
            challenge,
        })
    }

    // === Hooks ===

    /// Pre-move scan: first unvisited checkpoint on the path.
    #[must_use]
    pub fn crossed_checkpoint(&self, player: PlayerId, from: u32, to: u32) -> Option<u32> {
        let visited = self.visited.get(player)?;
        self.layout
            .crossed_checkpoint(from, to, |cell| visited.contains(&cell))
    }

    fn move_player(&mut self, player: PlayerId, to: u32) {
        let state = &mut self.players[player];
        let from = state.position;
        state.position = to;
        self.events.push(GameEvent::PlayerMoved { player, from, to });
        debug!(target: "board_game", %player, from, to, "moved");
    }

    fn check_finish(&mut self, player: PlayerId) -> Option<u32> {
        let state = &mut self.players[player];
        if state.finished || state.position < self.layout.max_cell() {
            return None;
        }
        let rank = self.next_rank;
        state.finished = true;
        state.rank = Some(rank);
        self.next_rank += 1;
        self.ranking.push(player);
        self.events.push(GameEvent::PlayerFinished { player, rank });
        info!(target: "board_game", %player, rank, "player finished");

        if self.players.iter().all(|(_, p)| p.finished) {
            self.phase = Phase::Completed;
            self.selected = None;
            let result = GameResult::Ranking(self.ranking.clone());
            info!(target: "board_game", ?result, "all players finished");
            self.events.push(GameEvent::GameFinished(result));
        }
        Some(rank)
    }

    /// Open the one-time challenge of a crossed checkpoint. The checkpoint
    /// counts as visited whatever the answer.
    pub fn trigger_checkpoint(&mut self, player: PlayerId, cell: u32) -> Result<bool, ActionError> {
        self.ensure_idle()?;
        let state = self
            .players
            .get(player)
            .ok_or(ActionError::UnknownPlayer(player))?;
        if state.finished || !self.layout.is_checkpoint(cell) {
            return Ok(false);
        }
        if self.visited[player].insert(cell).is_some() {
            return Ok(false);
        }
        self.open_challenge(player, cell, ChallengeKind::Checkpoint);
        Ok(true)
    }

    /// Post-move check: open a challenge if the player stands on a marker.
    pub fn trigger_marker(&mut self, player: PlayerId) -> Result<bool, ActionError> {
        self.ensure_idle()?;
        let state = self
            .players
            .get(player)
            .ok_or(ActionError::UnknownPlayer(player))?;
        if state.finished {
            return Ok(false);
        }
        let cell = state.position;
        let Some(marker) = self.layout.marker_at(cell) else {
            return Ok(false);
        };
        self.open_challenge(player, cell, marker.into());
        Ok(true)
    }

    fn open_challenge(&mut self, lander: PlayerId, cell: u32, kind: ChallengeKind) {
        if self.sites.ensure(&cell, &mut self.rng).is_none() {
            warn!(target: "board_game", cell, "no question available for cell");
        }
        let answerer = kind.is_forced().then_some(lander);
        if answerer.is_some() {
            self.sites.mark_asked(&cell);
        }
        self.challenge = Some(Challenge {
            cell,
            kind,
            lander,
            answerer,
        });
        self.events.push(GameEvent::ChallengeOpened {
            player: lander,
            cell,
            kind,
        });
        debug!(target: "board_game", %lander, cell, ?kind, "challenge opened");
    }

    /// Commit an answerer for the open challenge; the question counts as asked.
    pub fn decide_answerer(&mut self, answerer: PlayerId) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let challenge = self.challenge.as_mut().ok_or(ActionError::NoChallenge)?;
        if !self.players.contains(answerer) {
            return Err(ActionError::UnknownPlayer(answerer));
        }
        if challenge.kind.is_forced() && challenge.answerer != Some(answerer) {
            return Err(ActionError::InvalidTarget(answerer));
        }
        challenge.answerer = Some(answerer);
        let cell = challenge.cell;
        self.sites.mark_asked(&cell);
        self.commit();
        Ok(())
    }

    /// Judge the chosen option for the open challenge. Returns whether it
    /// was right.
    pub fn answer(&mut self, option: usize) -> Result<bool, ActionError> {
        self.ensure_playing()?;
        let challenge = self.challenge.ok_or(ActionError::NoChallenge)?;
        let answerer = challenge.answerer.ok_or(ActionError::AnswererRequired)?;
        let question = self.challenge_question().ok_or(ActionError::NoChallenge)?;
        let disabled = self
            .sites
            .site(&challenge.cell)
            .is_some_and(|s| s.is_disabled(option));
        if option >= question.options().len() || disabled {
            return Err(ActionError::OptionDisabled(option));
        }
        let correct = question.is_correct_option(option);

        let (verdict, policy) = match (correct, challenge.kind) {
            (true, _) => (Verdict::Correct, self.config.marker_rotation()),
            (false, ChallengeKind::Checkpoint) => {
                (Verdict::Wrong(Some(option)), self.config.checkpoint_rotation())
            }
            (false, _) => (Verdict::Wrong(Some(option)), self.config.marker_rotation()),
        };
        if let Some(rotation) = self.sites.judge(&challenge.cell, verdict, policy, &mut self.rng) {
            debug!(target: "board_game", cell = challenge.cell, from = %rotation.from, to = %rotation.to, "cell question rotated");
        }

        self.challenge = None;
        self.events.push(GameEvent::ChallengeResolved {
            cell: challenge.cell,
            answerer,
            correct,
        });
        if correct {
            self.reward = Some(PendingReward {
                player: answerer,
                lander: challenge.lander,
            });
        } else {
            self.hand_off(challenge.lander);
        }
        self.commit();
        Ok(correct)
    }

    /// Close the open challenge without answering; the turn passes.
    pub fn close_challenge(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let challenge = self.challenge.take().ok_or(ActionError::NoChallenge)?;
        self.events.push(GameEvent::ChallengeDeclined {
            cell: challenge.cell,
        });
        self.hand_off(challenge.lander);
        self.commit();
        Ok(())
    }

    /// Spend the pending reward, then hand the turn on.
    pub fn claim_reward(&mut self, choice: RewardChoice) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let reward = self.reward.ok_or(ActionError::NoReward)?;
        let player = reward.player;
        match choice {
            RewardChoice::Shield => {
                self.players[player].shield += 1;
                self.events.push(GameEvent::ShieldGained { player });
            }
            RewardChoice::Shoot(target) => {
                let victim = self
                    .players
                    .get(target)
                    .ok_or(ActionError::UnknownPlayer(target))?;
                if target == player || victim.finished {
                    return Err(ActionError::InvalidTarget(target));
                }
                self.events.push(GameEvent::Shot {
                    shooter: player,
                    target,
                });
                if victim.shield > 0 {
                    self.players[target].shield -= 1;
                    self.events.push(GameEvent::ShieldBroken { player: target });
                } else {
                    let to = victim.position.saturating_sub(self.config.shot_pushback).max(1);
                    self.move_player(target, to);
                }
            }
        }
        self.reward = None;
        self.hand_off(reward.lander);
        self.commit();
        Ok(())
    }

    /// Turn handoff: select the next unfinished player after `from`.
    pub fn hand_off(&mut self, from: PlayerId) {
        self.selected = self.next_active_player(from);
        if let Some(player) = self.selected {
            self.events.push(GameEvent::TurnPassed { player });
        }
    }
}

/// Everything needed to rebuild a [`BoardGame`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub config: BoardConfig,
    pub pool: QuestionPool,
    pub rng: GameRngState,
    pub phase: Phase,
    pub players: Vec<BoardPlayer>,
    pub selected: Option<PlayerId>,
    pub steps: u32,
    pub layout: BoardLayout,
    pub visited: Vec<OrdSet<u32>>,
    pub sites: AssignmentEngine<u32>,
    pub challenge: Option<Challenge>,
    pub reward: Option<PendingReward>,
    pub next_rank: u32,
    pub ranking: Vec<PlayerId>,
    pub session: u64,
    pub revision: u64,
}

impl GameMachine for BoardGame {
    type Snapshot = BoardSnapshot;

    const GAME_TAG: &'static str = "snakes-ladders";

    fn phase(&self) -> Phase {
        self.phase
    }

    fn current_player(&self) -> Option<PlayerId> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.selected
    }

    fn result(&self) -> Option<GameResult> {
        (self.phase == Phase::Completed).then(|| GameResult::Ranking(self.ranking.clone()))
    }

    /// The board has no timed behavior.
    fn advance_time(&mut self, _ms: u64) {}

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn session(&self) -> u64 {
        self.session
    }

    fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            config: self.config.clone(),
            pool: self.pool.clone(),
            rng: self.rng.state(),
            phase: self.phase,
            players: self.players.iter().map(|(_, p)| p.clone()).collect(),
            selected: self.selected,
            steps: self.steps,
            layout: self.layout.clone(),
            visited: self.visited.iter().map(|(_, v)| v.clone()).collect(),
            sites: self.sites.clone(),
            challenge: self.challenge,
            reward: self.reward,
            next_rank: self.next_rank,
            ranking: self.ranking.clone(),
            session: self.session,
            revision: self.revision,
        }
    }

    fn restore(snapshot: BoardSnapshot) -> Result<Self, RestoreError> {
        validate(&snapshot)?;
        let inconsistent = || RestoreError::Inconsistent("no players".to_string());
        Ok(Self {
            players: PlayerMap::from_vec(snapshot.players).ok_or_else(inconsistent)?,
            visited: PlayerMap::from_vec(snapshot.visited).ok_or_else(inconsistent)?,
            config: snapshot.config,
            pool: snapshot.pool,
            rng: GameRng::from_state(&snapshot.rng),
            phase: snapshot.phase,
            selected: snapshot.selected,
            steps: snapshot.steps,
            layout: snapshot.layout,
            sites: snapshot.sites,
            challenge: snapshot.challenge,
            reward: snapshot.reward,
            next_rank: snapshot.next_rank,
            ranking: snapshot.ranking,
            events: Vec::new(),
            session: snapshot.session,
            revision: snapshot.revision,
        })
    }
}

/// Reject snapshots whose players, cells or prompts disagree with the board.
fn validate(snapshot: &BoardSnapshot) -> Result<(), RestoreError> {
    let config = &snapshot.config;
    let layout = &snapshot.layout;
    let count = config.player_names.len();
    let known = |p: PlayerId| p.index() < count;

    RestoreError::require(snapshot.players.len() == count, "player count")?;
    RestoreError::require(snapshot.visited.len() == count, "visited sets count")?;
    RestoreError::require(layout.size() == config.size, "board size")?;
    RestoreError::require(
        snapshot
            .players
            .iter()
            .all(|p| (1..=layout.max_cell()).contains(&p.position)),
        "player position off the board",
    )?;
    RestoreError::require(
        snapshot
            .visited
            .iter()
            .all(|cells| cells.iter().all(|&c| layout.is_checkpoint(c))),
        "visited cell is not a checkpoint",
    )?;
    RestoreError::require(snapshot.selected.map_or(true, known), "selected player")?;
    RestoreError::require(
        (config.min_steps..=config.max_steps).contains(&snapshot.steps),
        "step count",
    )?;
    if let Some(challenge) = &snapshot.challenge {
        let on_cell = layout.is_checkpoint(challenge.cell)
            || layout.marker_at(challenge.cell).is_some();
        RestoreError::require(on_cell, "challenge cell")?;
        RestoreError::require(known(challenge.lander), "challenge lander")?;
        RestoreError::require(challenge.answerer.map_or(true, known), "challenge answerer")?;
    }
    if let Some(reward) = &snapshot.reward {
        RestoreError::require(known(reward.player) && known(reward.lander), "reward player")?;
    }
    RestoreError::require(snapshot.ranking.iter().all(|&p| known(p)), "ranking")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::board::MarkerKind;

    fn started(seed: u64) -> BoardGame {
        let mut game = BoardGameBuilder::new().build(seed);
        game.set_player_names(["Merah", "Hijau", "Biru"]);
        game.drain_events();
        game
    }

    /// Place a player directly, bypassing hooks.
    fn place(game: &mut BoardGame, player: PlayerId, cell: u32) {
        game.players[player].position = cell;
    }

    #[test]
    fn test_setup() {
        let game = started(1);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.selected_player(), Some(PlayerId::new(0)));
        assert_eq!(game.players().player_count(), 3);
        assert_eq!(game.layout().checkpoints(), &[14, 28, 42]);
        assert_eq!(game.sites().site_count(), game.layout().challenge_cells().len());
    }

    #[test]
    fn test_steps_clamped() {
        let mut game = started(2);
        assert_eq!(game.set_steps(9), 6);
        assert_eq!(game.increment_steps(), 6);
        assert_eq!(game.set_steps(0), 1);
        assert_eq!(game.decrement_steps(), 1);
        assert_eq!(game.increment_steps(), 2);
    }

    #[test]
    fn test_plain_move_hands_off() {
        let mut game = started(3);
        let p0 = PlayerId::new(0);
        let Some(target) = (2..=7).find(|&c| game.layout().marker_at(c).is_none()) else {
            return;
        };
        game.set_steps(target - 1);
        let report = game.advance_selected().unwrap();
        assert_eq!(report.to, target);
        assert!(report.challenge.is_none());
        assert_eq!(game.player(p0).unwrap().position, target);
        assert_eq!(game.selected_player(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_checkpoint_fires_once_per_player() {
        let mut game = started(4);
        let p0 = PlayerId::new(0);
        place(&mut game, p0, 12);
        game.set_steps(4);

        let report = game.advance_selected().unwrap();
        assert_eq!(report.challenge, Some(ChallengeKind::Checkpoint));
        assert_eq!(game.challenge().unwrap().cell, 14);
        assert_eq!(game.challenge().unwrap().answerer, Some(p0));
        assert_eq!(game.visited_checkpoints(p0), vec![14]);

        game.close_challenge().unwrap();
        assert_eq!(game.selected_player(), Some(PlayerId::new(1)));

        // Cross the same checkpoint again.
        place(&mut game, p0, 12);
        game.select_player(p0).unwrap();
        let report = game.advance_selected().unwrap();
        assert_ne!(report.challenge, Some(ChallengeKind::Checkpoint));
    }

    #[test]
    fn test_optional_marker_needs_answerer() {
        let mut game = started(5);
        let p0 = PlayerId::new(0);
        let cell = *game
            .layout()
            .markers()
            .iter()
            .find(|(c, k)| **k == MarkerKind::Optional && **c <= 7)
            .unwrap()
            .0;
        game.set_steps(cell - 1);
        let report = game.advance_selected().unwrap();
        assert_eq!(report.challenge, Some(ChallengeKind::Optional));
        assert_eq!(game.answer(0), Err(ActionError::AnswererRequired));
        assert!(game.sites().asked_questions().is_empty());

        game.decide_answerer(PlayerId::new(2)).unwrap();
        assert_eq!(game.sites().asked_questions().len(), 1);
        let question = game.challenge_question().unwrap().clone();
        let correct = question.correct_index().unwrap();
        assert!(game.answer(correct).unwrap());
        assert_eq!(game.pending_reward().unwrap().player, PlayerId::new(2));
        assert_eq!(game.pending_reward().unwrap().lander, p0);
        assert_eq!(game.advance_selected().unwrap_err(), ActionError::PromptOpen);

        game.claim_reward(RewardChoice::Shield).unwrap();
        assert_eq!(game.player(PlayerId::new(2)).unwrap().shield, 1);
        assert_eq!(game.selected_player(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_wrong_answer_disables_option() {
        let mut game = started(6);
        let p0 = PlayerId::new(0);
        place(&mut game, p0, 12);
        game.set_steps(4);
        game.advance_selected().unwrap();

        let question = game.challenge_question().unwrap().clone();
        let correct = question.correct_index().unwrap();
        let wrong = (correct + 1) % question.options().len();
        assert!(!game.answer(wrong).unwrap());
        // Checkpoint questions rotate after any wrong answer.
        assert!(game.sites().disabled_options(&14).is_empty());
        assert!(game.sites().question_at(&14).is_some());
        assert!(game.challenge().is_none());
        assert_eq!(game.selected_player(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_shot_and_shield() {
        let mut game = started(7);
        let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
        place(&mut game, p1, 10);
        game.reward = Some(PendingReward {
            player: p0,
            lander: p0,
        });
        assert_eq!(
            game.claim_reward(RewardChoice::Shoot(p0)),
            Err(ActionError::InvalidTarget(p0))
        );
        game.claim_reward(RewardChoice::Shoot(p1)).unwrap();
        assert_eq!(game.player(p1).unwrap().position, 7);

        game.players[p1].shield = 1;
        game.reward = Some(PendingReward {
            player: p0,
            lander: p0,
        });
        game.claim_reward(RewardChoice::Shoot(p1)).unwrap();
        assert_eq!(game.player(p1).unwrap().position, 7);
        assert_eq!(game.player(p1).unwrap().shield, 0);
        assert!(game
            .drain_events()
            .contains(&GameEvent::ShieldBroken { player: p1 }));

        assert_eq!(game.claim_reward(RewardChoice::Shield), Err(ActionError::NoReward));
    }

    #[test]
    fn test_shot_stops_at_start() {
        let mut game = started(8);
        let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
        place(&mut game, p1, 2);
        game.reward = Some(PendingReward {
            player: p0,
            lander: p0,
        });
        game.claim_reward(RewardChoice::Shoot(p1)).unwrap();
        assert_eq!(game.player(p1).unwrap().position, 1);
    }

    #[test]
    fn test_ranking_and_completion() {
        let mut game = started(9);
        game.set_steps(6);
        for (i, p) in PlayerId::all(3).enumerate() {
            place(&mut game, p, 46);
            game.select_player(p).unwrap();
            let report = game.advance_selected().unwrap();
            assert_eq!(report.to, 49);
            assert_eq!(report.rank, Some(i as u32 + 1));
        }
        assert_eq!(game.phase(), Phase::Completed);
        assert_eq!(
            game.result(),
            Some(GameResult::Ranking(vec![
                PlayerId::new(0),
                PlayerId::new(1),
                PlayerId::new(2)
            ]))
        );
        assert_eq!(game.current_player(), None);
    }

    #[test]
    fn test_handoff_skips_finished() {
        let mut game = started(10);
        game.players[PlayerId::new(1)].finished = true;
        assert_eq!(game.next_active_player(PlayerId::new(0)), Some(PlayerId::new(2)));
        assert_eq!(game.next_active_player(PlayerId::new(2)), Some(PlayerId::new(0)));
        assert_eq!(
            game.select_player(PlayerId::new(1)),
            Err(ActionError::PlayerFinished(PlayerId::new(1)))
        );
    }

    #[test]
    fn test_confirm_reset_clears_everything() {
        let mut game = started(11);
        place(&mut game, PlayerId::new(0), 12);
        game.set_steps(4);
        game.advance_selected().unwrap();
        game.confirm_reset();

        assert_eq!(game.phase(), Phase::NameInput);
        assert!(game.challenge().is_none());
        assert!(game.visited_checkpoints(PlayerId::new(0)).is_empty());
        assert!(game.sites().asked_questions().is_empty());
        assert!(game.players().iter().all(|(_, p)| p.position == 1));
        assert_eq!(game.steps(), 1);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut game = started(12);
        place(&mut game, PlayerId::new(0), 12);
        game.set_steps(4);
        game.advance_selected().unwrap();

        let snapshot = game.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(BoardGame::restore(back).unwrap().snapshot(), snapshot);
    }

    #[test]
    fn test_restore_rejects_inconsistent_snapshots() {
        let game = started(13);
        let good = game.snapshot();

        let mut missing_player = good.clone();
        missing_player.players.pop();
        let mut off_board = good.clone();
        off_board.players[2].position = 50;
        let mut stranger = good.clone();
        stranger.selected = Some(PlayerId::new(3));
        let mut plain_cell = good.clone();
        let cell = (2..49)
            .find(|&c| !game.layout().is_checkpoint(c) && game.layout().marker_at(c).is_none())
            .unwrap();
        plain_cell.challenge = Some(Challenge {
            kind: ChallengeKind::Checkpoint,
            cell,
            lander: PlayerId::new(0),
            answerer: Some(PlayerId::new(0)),
        });
        let mut bad_steps = good.clone();
        bad_steps.steps = 7;

        for snapshot in [missing_player, off_board, stranger, plain_cell, bad_steps] {
            assert!(matches!(
                BoardGame::restore(snapshot),
                Err(RestoreError::Inconsistent(_))
            ));
        }
        assert!(BoardGame::restore(good).is_ok());
    }

    #[test]
    fn test_session_survives_restore() {
        let game = started(14);
        assert_ne!(game.session(), started(14).session());
        let back = BoardGame::restore(game.snapshot()).unwrap();
        assert_eq!(back.session(), game.session());
    }
}
