pub mod mixer;

pub use mixer::{AudioCommand, AudioQueue};
