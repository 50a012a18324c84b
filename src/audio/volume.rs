use serde::{Deserialize, Serialize};

use super::cue::SoundCue;
use crate::persistence::{SaveSlot, StorageSlot, VOLUME_KEY};

/// Player-chosen mix levels, each in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeSettings {
    /// Background music.
    pub bgm: f32,
    /// Sound effects.
    pub sfx: f32,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self { bgm: 0.1, sfx: 0.5 }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

impl VolumeSettings {
    pub fn set_bgm(&mut self, value: f32) {
        self.bgm = clamp_unit(value);
    }

    pub fn set_sfx(&mut self, value: f32) {
        self.sfx = clamp_unit(value);
    }

    /// Final playback volume of a cue.
    #[must_use]
    pub fn cue_volume(&self, cue: SoundCue) -> f32 {
        clamp_unit(cue.gain() * self.sfx)
    }

    /// Saved settings, or the defaults. Out-of-range values are clamped.
    pub fn load<S: StorageSlot>(slot: &mut SaveSlot<S>) -> Self {
        let saved: Option<VolumeSettings> = slot.fetch(VOLUME_KEY);
        saved.map_or_else(Self::default, |s| Self {
            bgm: clamp_unit(s.bgm),
            sfx: clamp_unit(s.sfx),
        })
    }

    /// Persist the settings. Returns whether they were stored.
    pub fn save<S: StorageSlot>(&self, slot: &mut SaveSlot<S>, now_secs: u64) -> bool {
        slot.store(VOLUME_KEY, self, now_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySlot;

    #[test]
    fn test_defaults_and_clamp() {
        let mut volume = VolumeSettings::default();
        assert_eq!(volume.bgm, 0.1);
        assert_eq!(volume.sfx, 0.5);
        volume.set_bgm(3.0);
        volume.set_sfx(-1.0);
        assert_eq!(volume.bgm, 1.0);
        assert_eq!(volume.sfx, 0.0);
        volume.set_sfx(f32::NAN);
        assert_eq!(volume.sfx, 0.0);
    }

    #[test]
    fn test_persisted() {
        let mut slot = SaveSlot::new(MemorySlot::new());
        assert_eq!(VolumeSettings::load(&mut slot), VolumeSettings::default());

        let mut volume = VolumeSettings::default();
        volume.set_sfx(0.25);
        assert!(volume.save(&mut slot, 0));
        assert_eq!(VolumeSettings::load(&mut slot).sfx, 0.25);
    }

    #[test]
    fn test_cue_volume() {
        let volume = VolumeSettings { bgm: 0.1, sfx: 0.5 };
        assert!((volume.cue_volume(SoundCue::OpenCard) - 0.4).abs() < 1e-6);
    }
}
