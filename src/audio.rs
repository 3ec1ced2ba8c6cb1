//! Audio cue dispatch
//!
//! The simulation only emits [`GameEvent`]s; this module maps them to sound
//! effects, level music and the engine loop on whatever backend is attached.
//! Missing backends are not an error: audio is simply disabled.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player gun burst
    Fire,
    /// Enemy or boss destroyed
    Explosion,
    /// Power-up collected
    PowerUp,
    /// Boss arrival sting
    BossEnter,
    GameOver,
}

impl SoundEffect {
    /// Asset name the backend should look up
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Fire => "pew",
            SoundEffect::Explosion => "boom",
            SoundEffect::PowerUp => "powerup",
            SoundEffect::BossEnter => "boss_enter",
            SoundEffect::GameOver => "gameover",
        }
    }
}

/// Music track asset for a level
pub fn music_track(level: u32) -> String {
    format!("level{level}_bgm")
}

/// Output device contract
pub trait AudioBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
    /// Start looping the track; replaces any playing track
    fn start_music(&mut self, track: &str, volume: f32);
    fn stop_music(&mut self);
    fn start_engine(&mut self, volume: f32);
    fn stop_engine(&mut self);
    /// Volume change for the music and engine loops already playing
    fn set_loop_volumes(&mut self, music: f32, engine: f32);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {} at {:.2}", effect.asset_name(), volume);
    }

    fn start_music(&mut self, track: &str, volume: f32) {
        log::debug!("music {} at {:.2}", track, volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }

    fn start_engine(&mut self, volume: f32) {
        log::trace!("engine loop at {:.2}", volume);
    }

    fn stop_engine(&mut self) {
        log::trace!("engine loop stopped");
    }

    fn set_loop_volumes(&mut self, music: f32, engine: f32) {
        log::trace!("loop volumes music {:.2} engine {:.2}", music, engine);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    engine_running: bool,
    music_playing: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        let defaults = Settings::default();
        Self {
            backend,
            sfx_volume: defaults.sfx_volume,
            music_volume: defaults.music_volume,
            muted: defaults.muted,
            engine_running: false,
            music_playing: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
        self.refresh_loops();
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.refresh_loops();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_loops();
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
        self.refresh_loops();
    }

    fn effective_sfx(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    fn effective_music(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    fn refresh_loops(&mut self) {
        let (music, engine) = (self.effective_music(), self.effective_sfx());
        if let Some(backend) = self.backend.as_mut() {
            backend.set_loop_volumes(music, engine);
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_sfx();
        if vol <= 0.0 {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.play_effect(effect, vol);
        }
    }

    /// Route a simulation event to the backend
    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Fire => self.play(SoundEffect::Fire),
            GameEvent::Explosion => self.play(SoundEffect::Explosion),
            GameEvent::PowerUp => self.play(SoundEffect::PowerUp),
            GameEvent::BossEnter => self.play(SoundEffect::BossEnter),
            GameEvent::GameOver => self.play(SoundEffect::GameOver),
            GameEvent::MusicStart(level) => {
                let vol = self.effective_music();
                if let Some(backend) = self.backend.as_mut() {
                    backend.start_music(&music_track(level), vol);
                    self.music_playing = true;
                }
            }
            GameEvent::MusicStop => {
                if !self.music_playing {
                    return;
                }
                if let Some(backend) = self.backend.as_mut() {
                    backend.stop_music();
                    self.music_playing = false;
                }
            }
            GameEvent::EngineStart => {
                let vol = self.effective_sfx();
                if self.engine_running {
                    return;
                }
                if let Some(backend) = self.backend.as_mut() {
                    backend.start_engine(vol);
                    self.engine_running = true;
                }
            }
            GameEvent::EngineStop => {
                if !self.engine_running {
                    return;
                }
                if let Some(backend) = self.backend.as_mut() {
                    backend.stop_engine();
                    self.engine_running = false;
                }
            }
            GameEvent::NewHighScore(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Effect(SoundEffect, f32),
        Music(String, f32),
        MusicStop,
        Engine(f32),
        EngineStop,
        Volumes(f32, f32),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl AudioBackend for Recorder {
        fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push(Call::Effect(effect, volume));
        }
        fn start_music(&mut self, track: &str, volume: f32) {
            self.0.borrow_mut().push(Call::Music(track.to_string(), volume));
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().push(Call::MusicStop);
        }
        fn start_engine(&mut self, volume: f32) {
            self.0.borrow_mut().push(Call::Engine(volume));
        }
        fn stop_engine(&mut self) {
            self.0.borrow_mut().push(Call::EngineStop);
        }
        fn set_loop_volumes(&mut self, music: f32, engine: f32) {
            self.0.borrow_mut().push(Call::Volumes(music, engine));
        }
    }

    fn manager() -> (AudioManager, Recorder) {
        let recorder = Recorder::default();
        let audio = AudioManager::new(Some(Box::new(recorder.clone())));
        (audio, recorder)
    }

    #[test]
    fn test_events_map_to_cues() {
        let (mut audio, rec) = manager();
        audio.handle(&GameEvent::Fire);
        audio.handle(&GameEvent::MusicStart(2));
        audio.handle(&GameEvent::NewHighScore(10));
        let calls = rec.0.borrow();
        assert_eq!(calls[0], Call::Effect(SoundEffect::Fire, 0.45));
        assert_eq!(calls[1], Call::Music("level2_bgm".to_string(), 0.35));
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_engine_loop_not_doubled() {
        let (mut audio, rec) = manager();
        audio.handle(&GameEvent::EngineStart);
        audio.handle(&GameEvent::EngineStart);
        audio.handle(&GameEvent::EngineStop);
        audio.handle(&GameEvent::EngineStop);
        assert_eq!(*rec.0.borrow(), vec![Call::Engine(0.45), Call::EngineStop]);
    }

    #[test]
    fn test_muted_skips_effects() {
        let (mut audio, rec) = manager();
        audio.set_muted(true);
        rec.0.borrow_mut().clear();
        audio.handle(&GameEvent::Explosion);
        assert!(rec.0.borrow().is_empty());
    }

    #[test]
    fn test_volume_clamped_and_pushed_to_loops() {
        let (mut audio, rec) = manager();
        audio.set_music_volume(1.7);
        assert_eq!(audio.music_volume(), 1.0);
        assert_eq!(rec.0.borrow().last(), Some(&Call::Volumes(1.0, 0.45)));
    }

    #[test]
    fn test_no_backend_is_silent() {
        let mut audio = AudioManager::default();
        assert!(!audio.is_enabled());
        audio.handle(&GameEvent::BossEnter);
        audio.handle(&GameEvent::MusicStop);
    }
}
