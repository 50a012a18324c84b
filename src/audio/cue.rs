use serde::{Deserialize, Serialize};

use crate::rules::{GameEvent, GameResult};

/// Sound effects the host can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    OpenCard,
    MatchCard,
    FinishGame,
    WalkForward,
    WalkBackward,
    Shooting,
    ShieldBroken,
    GetShield,
    VictoryFirst,
    VictoryAllRanking,
}

impl SoundCue {
    /// Cue for a game event, if it has one.
    #[must_use]
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        let cue = match event {
            GameEvent::CardOpened { .. } => SoundCue::OpenCard,
            GameEvent::MatchFound { .. } => SoundCue::MatchCard,
            GameEvent::GameFinished(GameResult::Ranking(_)) => SoundCue::VictoryAllRanking,
            GameEvent::GameFinished(_) => SoundCue::FinishGame,
            GameEvent::PlayerMoved { from, to, .. } if to > from => SoundCue::WalkForward,
            GameEvent::PlayerMoved { from, to, .. } if to < from => SoundCue::WalkBackward,
            GameEvent::Shot { .. } => SoundCue::Shooting,
            GameEvent::ShieldBroken { .. } => SoundCue::ShieldBroken,
            GameEvent::ShieldGained { .. } => SoundCue::GetShield,
            GameEvent::PlayerFinished { rank: 1, .. } => SoundCue::VictoryFirst,
            _ => return None,
        };
        Some(cue)
    }

    /// Asset path relative to the host's sound directory.
    #[must_use]
    pub fn asset(self) -> &'static str {
        match self {
            SoundCue::OpenCard => "match-game/open-card.mp3",
            SoundCue::MatchCard => "match-game/match-card.mp3",
            SoundCue::FinishGame => "match-game/finish-game.mp3",
            SoundCue::WalkForward => "snake-ladder/walking-forward.mp3",
            SoundCue::WalkBackward => "snake-ladder/walking-backward.mp3",
            SoundCue::Shooting => "snake-ladder/shooting.mp3",
            SoundCue::ShieldBroken => "snake-ladder/shield-broken.mp3",
            SoundCue::GetShield => "snake-ladder/get-shield.mp3",
            SoundCue::VictoryFirst => "snake-ladder/victory-1st.mp3",
            SoundCue::VictoryAllRanking => "snake-ladder/victory-all-ranking.mp3",
        }
    }

    /// Mix level of the cue before the player's effect volume applies.
    #[must_use]
    pub fn gain(self) -> f32 {
        match self {
            SoundCue::OpenCard
            | SoundCue::MatchCard
            | SoundCue::FinishGame
            | SoundCue::VictoryFirst
            | SoundCue::VictoryAllRanking => 0.8,
            SoundCue::WalkForward | SoundCue::WalkBackward => 0.6,
            SoundCue::Shooting | SoundCue::ShieldBroken | SoundCue::GetShield => 0.7,
        }
    }

    /// Whether the cue loops until stopped (walking plays for the whole move).
    #[must_use]
    pub fn loops(self) -> bool {
        matches!(self, SoundCue::WalkForward)
    }
}
