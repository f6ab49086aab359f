//! Fruit Slice entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use fruit_slice::audio::AudioManager;
    use fruit_slice::consts::*;
    use fruit_slice::persistence::{LocalStorageScoreSink, record_round};
    use fruit_slice::platform::{Hud, SoundEffect};
    use fruit_slice::renderer::{RenderState, ShapeBatch};
    use fruit_slice::session::{Session, User};
    use fruit_slice::sim::GameState;
    use fruit_slice::{LoopDriver, Settings};

    // Bridge to the page's auth provider (window.fruitSliceAuth)
    #[wasm_bindgen(inline_js = "
        function provider() {
            const auth = window.fruitSliceAuth;
            if (!auth) {
                throw new Error('no auth provider on window.fruitSliceAuth');
            }
            return auth;
        }

        export function auth_sign_in() {
            try {
                return Promise.resolve(provider().signIn());
            } catch (e) {
                return Promise.reject(e);
            }
        }

        export function auth_sign_out() {
            try {
                return Promise.resolve(provider().signOut());
            } catch (e) {
                return Promise.reject(e);
            }
        }

        export function auth_subscribe(callback) {
            const auth = window.fruitSliceAuth;
            if (auth && auth.onAuthStateChanged) {
                auth.onAuthStateChanged(callback);
                return true;
            }
            return false;
        }
    ")]
    extern "C" {
        fn auth_sign_in() -> js_sys::Promise;
        fn auth_sign_out() -> js_sys::Promise;
        fn auth_subscribe(callback: &Closure<dyn FnMut(JsValue)>) -> bool;
    }

    /// HUD backed by DOM elements
    struct DomHud {
        document: Document,
        audio: AudioManager,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl Hud for DomHud {
        fn set_score_text(&mut self, text: &str) {
            self.set_text("score", text);
        }

        fn set_lives_text(&mut self, text: &str) {
            self.set_text("lives", text);
        }

        fn show_round_end(&mut self, message: &str) {
            self.set_text("round-over-message", message);
            if let Some(el) = self.document.get_element_by_id("round-over") {
                let _ = el.set_attribute("class", "");
            }
        }

        fn hide_round_end(&mut self) {
            if let Some(el) = self.document.get_element_by_id("round-over") {
                let _ = el.set_attribute("class", "hidden");
            }
        }

        fn set_paused(&mut self, paused: bool) {
            if let Some(el) = self.document.get_element_by_id("paused") {
                let _ = el.set_attribute("class", if paused { "" } else { "hidden" });
            }
        }

        fn play_sound(&mut self, effect: SoundEffect) {
            self.audio.play(effect);
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        driver: LoopDriver,
        batch: ShapeBatch,
        render_state: Option<RenderState>,
        hud: DomHud,
        session: Session,
        scores: LocalStorageScoreSink,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            self.driver
                .frame(&mut self.state, &mut self.batch, &mut self.hud);
            self.record_finished_rounds();
            self.render();
            self.track_fps(time);
        }

        fn spawn(&mut self) {
            if let Some(id) = self.driver.spawn(&mut self.state, &mut self.hud) {
                log::trace!("Spawned entity {}", id);
            }
        }

        fn pointer(&mut self, x: f32, y: f32) {
            let outcome = self
                .driver
                .pointer(&mut self.state, Vec2::new(x, y), &mut self.hud);
            log::debug!("Pointer at ({}, {}): {:?}", x, y, outcome);
            self.record_finished_rounds();
        }

        fn record_finished_rounds(&mut self) {
            for round in self.driver.take_finished_rounds() {
                record_round(&mut self.scores, &self.session, round, js_sys::Date::now());
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            if self.settings.show_fps {
                self.hud.set_text("fps", &format!("{} fps", self.fps));
            }
        }

        /// Provider reported a new signed-in user (or none)
        fn set_user(&mut self, user: Option<User>) {
            self.session.on_auth_state_changed(user);
            self.hud
                .set_text("user-name", &self.session.welcome_text());

            let signed_in = self.session.is_signed_in();
            for (id, visible) in [("login-btn", !signed_in), ("logout-btn", signed_in)] {
                if let Some(el) = self.hud.document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            }
        }
    }

    /// Read `{ uid, displayName }` from a provider user object
    fn user_from_js(value: &JsValue) -> Option<User> {
        if value.is_null() || value.is_undefined() {
            return None;
        }
        let uid = js_sys::Reflect::get(value, &JsValue::from_str("uid"))
            .ok()?
            .as_string()?;
        let display_name = js_sys::Reflect::get(value, &JsValue::from_str("displayName"))
            .ok()
            .and_then(|v| v.as_string());
        Some(User { uid, display_name })
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Fruit Slice starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let playfield = (client_w as f32, client_h as f32);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let mut driver = LoopDriver::new(SPLASH_RADIUS);
        driver.set_splashes_enabled(settings.effective_slice_splash());

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, playfield.0, playfield.1),
            driver,
            batch: ShapeBatch::new(),
            render_state: None,
            hud: DomHud {
                document: document.clone(),
                audio: AudioManager::new(&settings),
            },
            session: Session::new(),
            scores: LocalStorageScoreSink,
            settings,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        {
            let mut g = game.borrow_mut();
            let Game {
                state, driver, hud, ..
            } = &mut *g;
            driver.sync_hud(state, hud);
            hud.hide_round_end();
            hud.set_paused(false);
        }

        log::info!("Game initialized with seed: {}", seed);

        // Without WebGPU the game still runs; frames just aren't presented
        match init_renderer(&canvas, width, height, playfield).await {
            Some(render_state) => game.borrow_mut().render_state = Some(render_state),
            None => log::warn!("Rendering disabled"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_auth(game.clone());
        setup_auto_pause(game.clone());
        setup_pause_menu(game.clone());
        start_spawner(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Fruit Slice running!");
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        playfield: (f32, f32),
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to get device: {}", e);
                None
            }
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - slice at the cursor
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .pointer(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().pointer(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "Escape" | "p" | "P" => g.driver.toggle_pause(),
                " " | "Enter" => {
                    let Game {
                        state, driver, hud, ..
                    } = &mut *g;
                    driver.acknowledge(state, hud);
                }
                "m" | "M" => {
                    g.settings.muted = !g.settings.muted;
                    g.settings.save();
                    let Game { settings, hud, .. } = &mut *g;
                    hud.audio.apply_settings(settings);
                    log::info!("Muted: {}", settings.muted);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Sign-in buttons plus provider state notifications
    fn setup_auth(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                game.borrow_mut().set_user(user_from_js(&value));
            });
            if !auth_subscribe(&closure) {
                log::info!("No auth provider; playing as guest");
            }
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("login-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match JsFuture::from(auth_sign_in()).await {
                        Ok(value) => game.borrow_mut().set_user(user_from_js(&value)),
                        Err(e) => log::warn!("Login failed: {:?}", e),
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("logout-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match JsFuture::from(auth_sign_out()).await {
                        Ok(_) => game.borrow_mut().set_user(None),
                        Err(e) => log::warn!("Logout failed: {:?}", e),
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One spawn per interval, independent of the frame rate
    fn start_spawner(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().spawn();
        });
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SPAWN_INTERVAL_MS as i32,
        ) {
            log::error!("Failed to start spawner: {:?}", e);
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }

    /// Resume button on the paused banner; a tap on the canvas also resumes
    fn setup_pause_menu(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().driver.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    log::info!("Auto-paused (tab hidden)");
                    game.borrow_mut().driver.pause();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if !g.driver.is_paused() {
                log::info!("Auto-paused (window blur)");
                g.driver.pause();
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Slice (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seconds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(60);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let report = headless::run(seed, seconds);
    println!(
        "{} frames, {} rounds, best score {}, {} score records saved",
        report.frames, report.rounds, report.best_score, report.records
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the full loop driven by a simple autoplayer
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use fruit_slice::LoopDriver;
    use fruit_slice::consts::FRAME_MS;
    use fruit_slice::persistence::{MemoryScoreSink, record_round};
    use fruit_slice::platform::LogHud;
    use fruit_slice::renderer::ShapeBatch;
    use fruit_slice::session::{LocalAuth, Session};
    use fruit_slice::sim::{GameState, SpawnClock, hit_test};

    /// Frames between autoplayer swipes
    const SWIPE_EVERY: u64 = 9;
    /// Fraction of the playfield a fruit must fall before the autoplayer reacts
    const REACTION_DEPTH: f32 = 0.75;
    /// Chance the autoplayer hesitates on a swipe
    const HESITATE_CHANCE: f64 = 0.4;

    pub struct Report {
        pub frames: u64,
        pub rounds: u32,
        pub best_score: u32,
        pub records: u32,
    }

    pub fn run(seed: u64, seconds: u32) -> Report {
        let mut game = GameState::new(seed, 800.0, 600.0);
        let mut driver = LoopDriver::new(game.tuning.splash_radius);
        let mut surface = ShapeBatch::new();
        let mut hud = LogHud;
        let mut clock = SpawnClock::new(game.tuning.spawn_interval_ms);
        let mut session = Session::new();
        let mut scores = MemoryScoreSink::default();
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut best_score = 0;

        if let Err(e) = session.sign_in(&mut LocalAuth::new("Demo")) {
            log::warn!("Playing as guest: {}", e);
        }
        driver.sync_hud(&game, &mut hud);

        let total_frames = seconds as u64 * 60;
        for frame in 0..total_frames {
            for _ in 0..clock.advance(FRAME_MS) {
                driver.spawn(&mut game, &mut hud);
            }
            driver.frame(&mut game, &mut surface, &mut hud);

            if frame % SWIPE_EVERY == 0 {
                if !game.is_round_active() {
                    driver.acknowledge(&mut game, &mut hud);
                } else if !player.random_bool(HESITATE_CHANCE) {
                    if let Some(target) = pick_target(&game) {
                        driver.pointer(&mut game, target, &mut hud);
                    }
                }
            }

            let now_ms = frame as f64 * FRAME_MS;
            for round in driver.take_finished_rounds() {
                best_score = best_score.max(round.final_score);
                record_round(&mut scores, &session, round, now_ms);
            }
        }

        log::info!(
            "Demo finished: {} rounds, best score {}, {} draw failures",
            game.rounds_played,
            best_score,
            driver.draw_failures()
        );

        Report {
            frames: driver.frames(),
            rounds: game.rounds_played,
            best_score,
            records: scores.writes,
        }
    }

    /// Center of the lowest fruit that is deep enough and not under a bomb
    fn pick_target(game: &GameState) -> Option<Vec2> {
        let depth = game.playfield.y * REACTION_DEPTH;
        let fruit = game
            .entities
            .iter()
            .filter(|e| e.kind.is_fruit() && e.pos.y >= depth)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        let center = fruit.pos + Vec2::splat(fruit.size / 2.0);
        let topmost = hit_test(&game.entities, center)?;
        if game.entities[topmost].kind.is_bomb() {
            return None;
        }
        Some(center)
    }
}
