use wasm_bindgen::prelude::*;

pub mod game;
pub mod idle_loop;
pub mod overlay;
pub mod sequencer;
pub mod settings;

use game::Mission;

orrery_web::export_game!(Mission, "mission-001");
