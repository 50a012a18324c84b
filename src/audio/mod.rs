//! Audio side of the games.
//!
//! The state machines only emit [`GameEvent`](crate::rules::GameEvent)s.
//! Hosts own an [`AudioSink`] and feed it the cue of each drained event;
//! nothing in the game core holds a playback handle.

mod cue;
mod volume;

pub use cue::SoundCue;
pub use volume::VolumeSettings;

use crate::rules::GameEvent;

/// Host-owned sound output.
pub trait AudioSink {
    /// Play a cue at `volume` (already mixed with the player's settings).
    fn play(&mut self, cue: SoundCue, volume: f32);

    /// Stop a looping cue.
    fn stop(&mut self, cue: SoundCue);
}

/// Play the cue of every event that has one.
pub fn play_events<A: AudioSink>(sink: &mut A, volume: &VolumeSettings, events: &[GameEvent]) {
    for cue in events.iter().filter_map(SoundCue::for_event) {
        sink.play(cue, volume.cue_volume(cue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[derive(Default)]
    struct Recorder(Vec<SoundCue>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue, _volume: f32) {
            self.0.push(cue);
        }

        fn stop(&mut self, _cue: SoundCue) {}
    }

    #[test]
    fn test_play_events() {
        let mut sink = Recorder::default();
        let events = vec![
            GameEvent::CardOpened { card: 0 },
            GameEvent::TurnPassed {
                player: PlayerId::new(1),
            },
            GameEvent::ShieldGained {
                player: PlayerId::new(1),
            },
        ];
        play_events(&mut sink, &VolumeSettings::default(), &events);
        assert_eq!(sink.0, vec![SoundCue::OpenCard, SoundCue::GetShield]);
    }
}
