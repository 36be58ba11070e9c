pub mod runner;

pub use orrery_engine as engine;
pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a scene.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - lifecycle exports (`game_init`, `game_tick`, `game_teardown`)
/// - one export per input event kind
/// - accessors for the instance buffer, game events and the frame JSON
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::Galaxy;
///
/// orrery_web::export_game!(Galaxy, "galaxy");
/// ```
///
/// The calling crate must depend on `wasm-bindgen`, `js-sys`, `web-sys`,
/// `log`, `console_log` and `console_error_panic_hook`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;
        use $crate::engine::{EntityId, InputEvent, KeyCode, SoundId};

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            if console_log::init_with_level(log::Level::Info).is_err() {
                web_sys::console::warn_1(&JsValue::from_str("logger already installed"));
            }

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            let now_seconds = js_sys::Date::now() / 1000.0;
            with_runner(|r| r.init(now_seconds));
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_configure(json: &str) -> Result<(), JsValue> {
            with_runner(|r| r.apply_config_json(json)).map_err(|e| JsValue::from_str(&e.to_string()))
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) -> Result<(), JsValue> {
            with_runner(|r| r.load_manifest(json)).map_err(|e| JsValue::from_str(&e.to_string()))
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_teardown() {
            with_runner(|r| r.teardown());
        }

        #[wasm_bindgen]
        pub fn game_resize(width: f32, height: f32) {
            with_runner(|r| r.resize(width, height));
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn game_key_down(code: &str) {
            let key = KeyCode::from_code(code);
            with_runner(|r| r.push_input(InputEvent::KeyDown { key }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(code: &str) {
            let key = KeyCode::from_code(code);
            with_runner(|r| r.push_input(InputEvent::KeyUp { key }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_enter(entity: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerEnter { entity: EntityId(entity) }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_leave(entity: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerLeave { entity: EntityId(entity) }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32, button: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32, button: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32, button: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_wheel(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_sound_ended(sound: u32) {
            with_runner(|r| r.push_input(InputEvent::SoundEnded { sound: SoundId(sound) }));
        }

        #[wasm_bindgen]
        pub fn game_sound_rejected(sound: u32) {
            with_runner(|r| r.push_input(InputEvent::SoundRejected { sound: SoundId(sound) }));
        }

        #[wasm_bindgen]
        pub fn game_asset_loaded(asset: u32) {
            with_runner(|r| r.push_input(InputEvent::AssetLoaded { asset }));
        }

        #[wasm_bindgen]
        pub fn game_asset_failed(asset: u32) {
            with_runner(|r| r.push_input(InputEvent::AssetFailed { asset }));
        }

        #[wasm_bindgen]
        pub fn game_load_progress(percent: f32) {
            with_runner(|r| r.push_input(InputEvent::LoadProgress { percent }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_json() -> String {
            with_runner(|r| r.frame_json().to_owned())
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_instance_floats() -> u32 {
            $crate::engine::RenderInstance::FLOATS as u32
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }
    };
}
