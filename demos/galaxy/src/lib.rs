use wasm_bindgen::prelude::*;

pub mod bodies;
pub mod game;
pub mod hover;
pub mod labels;
pub mod orbit;
pub mod settings;

use game::Galaxy;

orrery_web::export_game!(Galaxy, "galaxy");
