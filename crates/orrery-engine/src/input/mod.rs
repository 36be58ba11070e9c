pub mod bus;
pub mod keys;
pub mod queue;

pub use bus::{InputBus, Subscription};
pub use keys::{KeyCode, KeyState};
pub use queue::{InputChannel, InputEvent, InputQueue};
