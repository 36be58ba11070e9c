use crate::api::types::{EntityId, SoundId};
use crate::input::keys::KeyCode;

/// Input event types the engine understands.
/// Generic, with no scene-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    /// The pointer started hovering a renderable entity.
    PointerEnter { entity: EntityId },
    /// The pointer stopped hovering a renderable entity.
    PointerLeave { entity: EntityId },
    /// Screen-space coordinates in CSS pixels.
    PointerDown { x: f32, y: f32, button: u32 },
    PointerMove { x: f32, y: f32, button: u32 },
    PointerUp { x: f32, y: f32, button: u32 },
    Wheel { delta: f32 },
    /// A UI button or widget. `kind` identifies it; `a`, `b`, `c` carry data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
    /// A one-shot sound finished playing.
    SoundEnded { sound: SoundId },
    /// The host refused to start a sound (autoplay policy).
    SoundRejected { sound: SoundId },
    AssetLoaded { asset: u32 },
    AssetFailed { asset: u32 },
    /// Overall load progress, 0..=100.
    LoadProgress { percent: f32 },
}

/// Coarse category used to route events to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputChannel {
    Keyboard,
    Pointer,
    Ui,
    Audio,
    Assets,
}

impl InputEvent {
    pub fn channel(&self) -> InputChannel {
        match self {
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } => InputChannel::Keyboard,
            InputEvent::PointerEnter { .. }
            | InputEvent::PointerLeave { .. }
            | InputEvent::PointerDown { .. }
            | InputEvent::PointerMove { .. }
            | InputEvent::PointerUp { .. }
            | InputEvent::Wheel { .. } => InputChannel::Pointer,
            InputEvent::Custom { .. } => InputChannel::Ui,
            InputEvent::SoundEnded { .. } | InputEvent::SoundRejected { .. } => InputChannel::Audio,
            InputEvent::AssetLoaded { .. }
            | InputEvent::AssetFailed { .. }
            | InputEvent::LoadProgress { .. } => InputChannel::Assets,
        }
    }

    /// Click or key press: the gestures browsers accept for unlocking audio.
    pub fn is_user_gesture(&self) -> bool {
        matches!(self, InputEvent::KeyDown { .. } | InputEvent::PointerDown { .. })
    }
}

/// A queue of input events.
/// The host writes events into the queue; Rust drains them each frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
