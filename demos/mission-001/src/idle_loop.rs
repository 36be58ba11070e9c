/// Two-voice idle engine hum.
///
/// The clip is not seamless, so voice A is restarted just before its end
/// while voice B, started half a second earlier, covers the seam. Without a
/// known clip length A simply restarts when the host reports it ended.

use orrery_engine::{AudioQueue, SoundId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleLoopSettings {
    pub volume: f32,
    /// Seconds before A's end at which B starts.
    pub crossfade_lead: f32,
    /// Seconds before A's end at which A restarts.
    pub restart_lead: f32,
}

impl Default for IdleLoopSettings {
    fn default() -> Self {
        Self {
            volume: 0.3,
            crossfade_lead: 0.5,
            restart_lead: 0.05,
        }
    }
}

#[derive(Debug)]
pub struct IdleLoop {
    a: SoundId,
    b: SoundId,
    settings: IdleLoopSettings,
    clip_seconds: Option<f32>,
    /// Seconds into voice A, tracked locally.
    playhead: f32,
    b_started: bool,
    muted: bool,
    active: bool,
}

impl IdleLoop {
    pub fn new(a: SoundId, b: SoundId, settings: IdleLoopSettings) -> Self {
        Self {
            a,
            b,
            settings,
            clip_seconds: None,
            playhead: 0.0,
            b_started: false,
            muted: true,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn playhead(&self) -> f32 {
        self.playhead
    }

    /// Enables the crossfade once the manifest tells us how long the clip is.
    pub fn set_clip_seconds(&mut self, seconds: Option<f32>) {
        self.clip_seconds = seconds.filter(|s| *s > self.settings.crossfade_lead);
    }

    /// Start voice A muted; browsers allow muted playback before a gesture.
    pub fn start(&mut self, audio: &mut AudioQueue) {
        for voice in [self.a, self.b] {
            audio.set_volume(voice, self.settings.volume);
            audio.set_muted(voice, true);
        }
        audio.play(self.a, self.settings.volume);
        self.playhead = 0.0;
        self.b_started = false;
        self.muted = true;
        self.active = true;
    }

    /// Returns true the first time it unmutes.
    pub fn unmute(&mut self, audio: &mut AudioQueue) -> bool {
        if !self.muted || !self.active {
            return false;
        }
        for voice in [self.a, self.b] {
            audio.set_muted(voice, false);
        }
        self.muted = false;
        log::debug!("idle loop unmuted");
        true
    }

    pub fn update(&mut self, audio: &mut AudioQueue, dt: f32) {
        // A blocked or pending voice does not advance.
        if !self.active || !audio.is_playing(self.a) {
            return;
        }
        self.playhead += dt.max(0.0);
        let Some(clip) = self.clip_seconds else { return };

        if self.playhead >= clip - self.settings.crossfade_lead && !self.b_started {
            audio.stop(self.b);
            audio.play(self.b, self.settings.volume);
            self.b_started = true;
        }
        if self.playhead >= clip - self.settings.restart_lead {
            self.restart_a(audio);
        }
    }

    fn restart_a(&mut self, audio: &mut AudioQueue) {
        audio.stop(self.a);
        audio.play(self.a, self.settings.volume);
        self.playhead = 0.0;
        self.b_started = false;
    }

    /// The host reported one of our voices ended.
    pub fn on_ended(&mut self, sound: SoundId, audio: &mut AudioQueue) {
        if self.active && sound == self.a {
            self.restart_a(audio);
        }
    }

    /// Pause both voices for good.
    pub fn stop(&mut self, audio: &mut AudioQueue) {
        if !self.active {
            return;
        }
        audio.pause(self.a);
        audio.pause(self.b);
        self.active = false;
    }
}
