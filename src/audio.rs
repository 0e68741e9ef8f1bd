//! Audio cue routing
//!
//! Simulation events become sound cues with a mixer group, a linear volume
//! and a randomized pitch. Actual playback belongs to an [`AudioSink`] so the
//! game core stays device free.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::effects::{EffectSlot, VolumeFade};
use crate::settings::MixerLevels;
use crate::sim::{GameEvent, GamePhase};

/// Pitch varies by up to this much around 1.0
pub const PITCH_RANGE: f32 = 0.1;
/// Falling loop starts above this downward speed
pub const FALL_MIN_SPEED: f32 = 5.0;
/// Speed span over which the falling loop reaches full volume
pub const FALL_MAX_SPEED: f32 = 30.0;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Player touched down
    Land,
    /// Walking footstep
    Footstep,
    /// Running footstep
    FootstepSprint,
    /// Ground tile crumbled
    TileBreak,
    /// Orb picked up
    OrbBreak,
    /// Orb appeared
    OrbSpawn,
    /// Out of lives
    GameOver,
}

impl SoundEffect {
    pub fn group(&self) -> MixerGroup {
        match self {
            SoundEffect::GameOver => MixerGroup::Ui,
            _ => MixerGroup::Sfx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerGroup {
    Music,
    Sfx,
    Ui,
}

/// A one-shot to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    pub effect: SoundEffect,
    /// Linear gain after mixer attenuation (0.0 - 1.0)
    pub volume: f32,
    pub pitch: f32,
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, request: &PlayRequest);
    /// Falling wind loop; `None` stops it
    fn set_falling_loop(&mut self, volume: Option<f32>);
    fn set_music_volume(&mut self, volume: f32);
    fn stop_music(&mut self);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: usize,
}

impl AudioSink for LogSink {
    fn play(&mut self, request: &PlayRequest) {
        self.played += 1;
        log::trace!(
            "play {:?} vol {:.2} pitch {:.2}",
            request.effect,
            request.volume,
            request.pitch
        );
    }

    fn set_falling_loop(&mut self, volume: Option<f32>) {
        log::trace!("falling loop {:?}", volume);
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::trace!("music volume {:.2}", volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }
}

/// Cue for a simulation event, if it makes a sound
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::Jumped => Some(SoundEffect::Jump),
        GameEvent::Landed => Some(SoundEffect::Land),
        GameEvent::Footstep { sprinting: false } => Some(SoundEffect::Footstep),
        GameEvent::Footstep { sprinting: true } => Some(SoundEffect::FootstepSprint),
        GameEvent::TileDestroyed { .. } => Some(SoundEffect::TileBreak),
        GameEvent::OrbCollected { .. } => Some(SoundEffect::OrbBreak),
        GameEvent::OrbSpawned { .. } => Some(SoundEffect::OrbSpawn),
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        _ => None,
    }
}

/// Falling loop volume for a vertical speed, `None` while not falling fast
pub fn falling_volume(vertical_velocity: f32, min_speed: f32, max_speed: f32) -> Option<f32> {
    if vertical_velocity >= -min_speed || max_speed <= 0.0 {
        return None;
    }
    Some(((min_speed - vertical_velocity) / max_speed).min(1.0))
}

/// dB attenuation to a linear gain
pub fn decibels_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Audio manager for the game
pub struct AudioManager {
    levels: MixerLevels,
    muted: bool,
    /// Cosmetic randomness, kept apart from the simulation RNG
    rng: Pcg32,
    music: EffectSlot<VolumeFade>,
    music_volume: f32,
    falling: Option<f32>,
}

impl AudioManager {
    pub fn new(levels: MixerLevels, seed: u64) -> Self {
        Self {
            levels,
            muted: false,
            rng: Pcg32::seed_from_u64(seed),
            music: EffectSlot::new(),
            music_volume: 1.0,
            falling: None,
        }
    }

    pub fn set_levels(&mut self, levels: MixerLevels) {
        self.levels = levels;
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Linear gain for a mixer group, master included
    pub fn gain(&self, group: MixerGroup) -> f32 {
        if self.muted {
            return 0.0;
        }
        let group_db = match group {
            MixerGroup::Music => self.levels.music,
            MixerGroup::Sfx => self.levels.sfx,
            MixerGroup::Ui => self.levels.ui,
        };
        decibels_to_gain(self.levels.master) * decibels_to_gain(group_db)
    }

    /// Play a sound effect
    pub fn play<S: AudioSink + ?Sized>(&mut self, effect: SoundEffect, sink: &mut S) {
        let volume = self.gain(effect.group());
        if volume <= 0.0 {
            return;
        }
        let pitch = self
            .rng
            .random_range(1.0 - PITCH_RANGE..=1.0 + PITCH_RANGE);
        sink.play(&PlayRequest {
            effect,
            volume,
            pitch,
        });
    }

    /// Route a batch of simulation events
    pub fn handle_events<S: AudioSink + ?Sized>(&mut self, events: &[GameEvent], sink: &mut S) {
        for event in events {
            if let Some(effect) = cue_for(event) {
                self.play(effect, sink);
            }
        }
    }

    /// Keep the falling loop in step with the player's vertical speed
    pub fn update_falling<S: AudioSink + ?Sized>(
        &mut self,
        phase: GamePhase,
        grounded: bool,
        vertical_velocity: f32,
        sink: &mut S,
    ) {
        let volume = match phase {
            GamePhase::Playing if !grounded => {
                falling_volume(vertical_velocity, FALL_MIN_SPEED, FALL_MAX_SPEED)
            }
            _ => None,
        };
        let volume = volume.map(|v| v * self.gain(MixerGroup::Sfx));
        if volume != self.falling {
            self.falling = volume;
            sink.set_falling_loop(volume);
        }
    }

    /// Fade the music to silence, then stop it
    pub fn fade_out_music(&mut self, fade_time: f32) {
        self.music.start(VolumeFade::new(self.music_volume, fade_time));
    }

    pub fn is_music_fading(&self) -> bool {
        self.music.is_active()
    }

    /// Per frame update for running fades
    pub fn advance<S: AudioSink + ?Sized>(&mut self, dt: f32, sink: &mut S) {
        if let Some(finished) = self.music.poll(dt) {
            sink.stop_music();
            self.music_volume = finished.start_volume;
            sink.set_music_volume(self.music_volume * self.gain(MixerGroup::Music));
        } else if let Some(fade) = self.music.get() {
            sink.set_music_volume(fade.volume * self.gain(MixerGroup::Music));
        }
    }
}
