// audio/mixer.rs
//
// Audio is the only asynchronous I/O in the engine. Rust never touches the
// audio elements directly: it queues commands that the host drains every
// frame, and learns about completion or refusal through input events.

use serde::Serialize;
use crate::api::types::SoundId;

/// A command for the host's audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AudioCommand {
    /// Start (or resume) playback.
    Play { sound: SoundId, volume: f32, looped: bool },
    /// Pause, keeping the playhead.
    Pause { sound: SoundId },
    /// Pause and rewind to the start.
    Stop { sound: SoundId },
    SetVolume { sound: SoundId, volume: f32 },
    SetMuted { sound: SoundId, muted: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlayRequest {
    sound: SoundId,
    volume: f32,
    looped: bool,
}

/// Outgoing audio commands plus what Rust believes is currently playing.
#[derive(Debug, Default)]
pub struct AudioQueue {
    commands: Vec<AudioCommand>,
    playing: Vec<PlayRequest>,
    /// Plays the host refused; retried on the next user gesture.
    retry: Vec<PlayRequest>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, sound: SoundId, volume: f32) {
        self.start(PlayRequest { sound, volume, looped: false });
    }

    pub fn play_looped(&mut self, sound: SoundId, volume: f32) {
        self.start(PlayRequest { sound, volume, looped: true });
    }

    fn start(&mut self, req: PlayRequest) {
        self.retry.retain(|r| r.sound != req.sound);
        self.playing.retain(|r| r.sound != req.sound);
        self.playing.push(req);
        self.commands.push(AudioCommand::Play {
            sound: req.sound,
            volume: req.volume,
            looped: req.looped,
        });
    }

    pub fn pause(&mut self, sound: SoundId) {
        self.forget(sound);
        self.commands.push(AudioCommand::Pause { sound });
    }

    pub fn stop(&mut self, sound: SoundId) {
        self.forget(sound);
        self.commands.push(AudioCommand::Stop { sound });
    }

    fn forget(&mut self, sound: SoundId) {
        self.playing.retain(|r| r.sound != sound);
        self.retry.retain(|r| r.sound != sound);
    }

    pub fn set_volume(&mut self, sound: SoundId, volume: f32) {
        self.commands.push(AudioCommand::SetVolume { sound, volume });
    }

    pub fn set_muted(&mut self, sound: SoundId, muted: bool) {
        self.commands.push(AudioCommand::SetMuted { sound, muted });
    }

    pub fn is_playing(&self, sound: SoundId) -> bool {
        self.playing.iter().any(|r| r.sound == sound)
    }

    pub fn is_pending_retry(&self, sound: SoundId) -> bool {
        self.retry.iter().any(|r| r.sound == sound)
    }

    /// The host reported a one-shot finished.
    pub fn on_ended(&mut self, sound: SoundId) {
        self.playing.retain(|r| r.sound != sound || r.looped);
    }

    /// The host refused to start `sound`, typically until a user gesture.
    pub fn on_rejected(&mut self, sound: SoundId) {
        if let Some(idx) = self.playing.iter().position(|r| r.sound == sound) {
            let req = self.playing.remove(idx);
            log::debug!("sound {} blocked; retrying on next gesture", sound.0);
            self.retry.push(req);
        }
    }

    /// Re-issue every refused play. Called on click / key press.
    pub fn on_user_gesture(&mut self) {
        for req in std::mem::take(&mut self.retry) {
            self.start(req);
        }
    }

    /// Stop every known sound exactly once (teardown).
    pub fn stop_all(&mut self) {
        self.retry.clear();
        for req in std::mem::take(&mut self.playing) {
            self.commands.push(AudioCommand::Stop { sound: req.sound });
        }
    }

    /// Commands queued since the last drain, in issue order.
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending_commands(&self) -> &[AudioCommand] {
        &self.commands
    }
}
