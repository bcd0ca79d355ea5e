//! Named sound cues.
//!
//! `Sfx` owns the cue table and playback state; actual output goes through
//! an [`AudioBackend`].  Every operation on an unregistered name is a no-op.

use std::collections::HashMap;

use log::{debug, warn};

pub const ENGINE: &str = "engine";
pub const STAR: &str = "star";
pub const EXPLOSION: &str = "explosion";
pub const LEVEL_UP: &str = "levelup";
pub const GAME_OVER: &str = "gameover";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundOptions {
    pub looped: bool,
    pub volume: f32,
    /// Attached to an object in the world rather than the listener.
    pub positional: bool,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self { looped: false, volume: 0.5, positional: false }
    }
}

/// Sink for playback commands.
pub trait AudioBackend {
    fn load(&mut self, name: &str, options: &SoundOptions);
    fn play(&mut self, name: &str, options: &SoundOptions);
    fn stop(&mut self, name: &str);
    fn pause(&mut self, name: &str);
    fn set_volume(&mut self, name: &str, volume: f32);
    fn set_loop(&mut self, name: &str, looped: bool);
}

/// Backend that only logs.  Used when no audio device is wanted.
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn load(&mut self, name: &str, options: &SoundOptions) {
        debug!("sfx load {} {:?}", name, options);
    }
    fn play(&mut self, name: &str, _options: &SoundOptions) {
        debug!("sfx play {}", name);
    }
    fn stop(&mut self, name: &str) {
        debug!("sfx stop {}", name);
    }
    fn pause(&mut self, name: &str) {
        debug!("sfx pause {}", name);
    }
    fn set_volume(&mut self, name: &str, volume: f32) {
        debug!("sfx volume {} {:.2}", name, volume);
    }
    fn set_loop(&mut self, name: &str, looped: bool) {
        debug!("sfx loop {} {}", name, looped);
    }
}

#[derive(Clone, Debug)]
struct Cue {
    options: SoundOptions,
    playing: bool,
}

pub struct Sfx {
    backend: Box<dyn AudioBackend>,
    cues: HashMap<String, Cue>,
}

impl Sfx {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self { backend, cues: HashMap::new() }
    }

    /// Register (or re-register) a cue.
    pub fn load(&mut self, name: &str, options: SoundOptions) {
        self.backend.load(name, &options);
        self.cues.insert(name.to_string(), Cue { options, playing: false });
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.cues.contains_key(name)
    }

    /// Start a cue.  A looped cue that is already running is left alone;
    /// one-shot cues always retrigger.
    pub fn play(&mut self, name: &str) {
        let Some(cue) = self.cues.get_mut(name) else {
            warn!("sfx: unknown cue {}", name);
            return;
        };
        if cue.options.looped && cue.playing {
            return;
        }
        cue.playing = cue.options.looped;
        self.backend.play(name, &cue.options);
    }

    pub fn stop(&mut self, name: &str) {
        if let Some(cue) = self.cues.get_mut(name) {
            if cue.playing {
                cue.playing = false;
                self.backend.stop(name);
            }
        }
    }

    pub fn pause(&mut self, name: &str) {
        if let Some(cue) = self.cues.get_mut(name) {
            if cue.playing {
                cue.playing = false;
                self.backend.pause(name);
            }
        }
    }

    pub fn stop_all(&mut self) {
        let names: Vec<String> = self.cues.keys().cloned().collect();
        for name in names {
            self.stop(&name);
        }
    }

    pub fn set_volume(&mut self, name: &str, volume: f32) {
        if let Some(cue) = self.cues.get_mut(name) {
            cue.options.volume = volume;
            self.backend.set_volume(name, volume);
        }
    }

    pub fn set_loop(&mut self, name: &str, looped: bool) {
        if let Some(cue) = self.cues.get_mut(name) {
            cue.options.looped = looped;
            self.backend.set_loop(name, looped);
        }
    }

    /// Only looped cues report as playing; one-shots are fire-and-forget.
    pub fn is_playing(&self, name: &str) -> bool {
        self.cues.get(name).map(|c| c.playing).unwrap_or(false)
    }

    pub fn volume(&self, name: &str) -> Option<f32> {
        self.cues.get(name).map(|c| c.options.volume)
    }
}
