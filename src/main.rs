//! Watermelon Club entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use watermelon_club::audio::{AudioManager, SoundEffect};
    use watermelon_club::consts::*;
    use watermelon_club::platform::LocalStore;
    use watermelon_club::renderer::{RenderState, build_scene, viewport_to_board};
    use watermelon_club::sim::{FrameClock, GameEvent, GameState, TickInput, tick};
    use watermelon_club::{BestScores, QualityPreset, Settings};

    /// Cursor step for the arrow keys (board px)
    const KEY_NUDGE: f32 = 10.0;
    /// Master volume change per `-`/`+` press
    const VOLUME_STEP: f32 = 0.1;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        clock: FrameClock,
        last_time: f64,
        input: TickInput,
        settings: Settings,
        audio: AudioManager,
        best: BestScores,
        store: LocalStore,
        canvas: HtmlCanvasElement,
        /// Pending `requestAnimationFrame` handle
        frame_handle: Option<i32>,
        /// Loop halted by `pagehide`
        stopped: bool,
        /// Player closed the game-over dialog without restarting
        overlay_dismissed: bool,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement) -> Self {
            let store = LocalStore::new();
            let mut settings = Settings::load(&store);
            // `?quality=low` overrides the saved preset for this visit
            if let Some(preset) = web_sys::window()
                .and_then(|w| w.location().search().ok())
                .and_then(|query| QualityPreset::from_query(&query))
            {
                log::info!("Quality from URL: {}", preset.as_str());
                settings.quality = preset;
            }
            let best = BestScores::load(&store);

            let mut audio = AudioManager::new();
            audio.set_enabled(settings.sound_enabled);
            audio.set_master_volume(settings.master_volume);

            Self {
                state: GameState::new(seed),
                render_state: None,
                clock: FrameClock::new(),
                last_time: 0.0,
                input: TickInput::default(),
                settings,
                audio,
                best,
                store,
                canvas,
                frame_handle: None,
                stopped: false,
                overlay_dismissed: false,
            }
        }

        /// Board x under a client-space point
        fn client_to_board_x(&self, client_x: f64, client_y: f64) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            let (x, _) = viewport_to_board(
                (client_x - rect.left()) as f32,
                (client_y - rect.top()) as f32,
                rect.width() as f32,
                rect.height() as f32,
            );
            x
        }

        fn point_at(&mut self, client_x: f64, client_y: f64) {
            let x = self.client_to_board_x(client_x, client_y);
            self.input.cursor_x = Some(x);
        }

        fn drop_at(&mut self, client_x: f64, client_y: f64) {
            self.point_at(client_x, client_y);
            self.input.drop = true;
            // First gesture unlocks audio
            self.audio.resume();
        }

        fn nudge_cursor(&mut self, dx: f32) {
            let from = self.input.cursor_x.unwrap_or(self.state.drop_x);
            self.input.cursor_x = Some(from + dx);
        }

        fn toggle_sound(&mut self) {
            let enabled = self.settings.toggle_sound();
            self.audio.set_enabled(enabled);
            if enabled {
                self.audio.resume();
            }
            self.settings.save(&mut self.store);
            log::info!("Sound {}", if enabled { "on" } else { "off" });
        }

        fn cycle_quality(&mut self) {
            let preset = self.settings.cycle_quality();
            self.settings.save(&mut self.store);
            log::info!("Quality: {}", preset.as_str());
        }

        fn toggle_particles(&mut self) {
            let enabled = self.settings.toggle_particles();
            self.settings.save(&mut self.store);
            log::info!("Particles {}", if enabled { "on" } else { "off" });
        }

        fn adjust_volume(&mut self, delta: f32) {
            let volume = self.settings.adjust_volume(delta);
            self.audio.set_master_volume(volume);
            self.settings.save(&mut self.store);
            log::info!("Volume {:.0}%", volume * 100.0);
        }

        fn request_restart(&mut self) {
            self.input.restart = true;
            self.overlay_dismissed = false;
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            for _ in 0..self.clock.advance(dt) {
                tick(&mut self.state, &self.input);
                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }

            self.handle_events();
        }

        /// Feed simulation events to audio and the best-score readout
        fn handle_events(&mut self) {
            for event in self.state.take_events() {
                self.audio.play(SoundEffect::for_event(&event));
                match event {
                    GameEvent::GameOver { score } => {
                        self.record_score(score);
                    }
                    GameEvent::Won { score } => {
                        log::info!("Watermelon! Round won with {} points", score);
                        self.record_score(score);
                    }
                    GameEvent::Dropped { .. } | GameEvent::Merged { .. } => {}
                }
            }
        }

        fn record_score(&mut self, score: u64) {
            if self.best.record(score) {
                self.best.save(&mut self.store);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Keep the backing store matched to the displayed size
        fn sync_canvas_size(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            if let Some(ref mut render_state) = self.render_state {
                if render_state.size != (width, height) {
                    self.canvas.set_width(width);
                    self.canvas.set_height(height);
                    render_state.resize(width, height);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    if el.text_content().as_deref() != Some(text) {
                        el.set_text_content(Some(text));
                    }
                }
            };

            set_text("score", &self.state.score.to_string());
            set_text(
                "best",
                &self.best.display_best(self.state.score).to_string(),
            );
            set_text("tournament-best", &self.best.tournament_best.to_string());

            let next = self.state.next_fruit();
            set_text("next-fruit", next.glyph);
            set_text("next-fruit-name", next.name);

            set_text(
                "sound-btn",
                if self.settings.sound_enabled { "🔊" } else { "🔇" },
            );

            if let Some(el) = document.get_element_by_id("game-over") {
                let show = !self.state.is_running() && !self.overlay_dismissed;
                let class = if show { "overlay" } else { "overlay hidden" };
                if el.get_attribute("class").as_deref() != Some(class) {
                    let _ = el.set_attribute("class", class);
                }
                if show {
                    set_text("final-score", &self.state.score.to_string());
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Watermelon Club starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {e}"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_page_lifecycle(game.clone());

        request_animation_frame(game);

        log::info!("Watermelon Club running!");
    }

    /// Attach a listener for the lifetime of the page
    fn listen<E>(target: &EventTarget, kind: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        if target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for {kind}");
        }
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let g = game.clone();
        listen(canvas, "mousemove", move |event: MouseEvent| {
            g.borrow_mut()
                .point_at(event.client_x() as f64, event.client_y() as f64);
        });

        let g = game.clone();
        listen(canvas, "click", move |event: MouseEvent| {
            g.borrow_mut()
                .drop_at(event.client_x() as f64, event.client_y() as f64);
        });

        // Touch mirrors the mouse; preventDefault stops scrolling and the
        // synthetic click that would drop a second fruit
        let g = game.clone();
        listen(canvas, "touchmove", move |event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                g.borrow_mut()
                    .point_at(touch.client_x() as f64, touch.client_y() as f64);
            }
        });

        let g = game.clone();
        listen(canvas, "touchstart", move |event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                g.borrow_mut()
                    .drop_at(touch.client_x() as f64, touch.client_y() as f64);
            }
        });

        listen(canvas, "touchend", |event: TouchEvent| event.prevent_default());

        let Some(window) = web_sys::window() else { return };
        listen(&window, "keydown", move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                " " | "Enter" => {
                    event.prevent_default();
                    g.input.drop = true;
                    g.audio.resume();
                }
                "ArrowLeft" => g.nudge_cursor(-KEY_NUDGE),
                "ArrowRight" => g.nudge_cursor(KEY_NUDGE),
                "r" | "R" => g.request_restart(),
                "m" | "M" => g.toggle_sound(),
                "q" | "Q" => g.cycle_quality(),
                "p" | "P" => g.toggle_particles(),
                "-" => g.adjust_volume(-VOLUME_STEP),
                "=" | "+" => g.adjust_volume(VOLUME_STEP),
                _ => {}
            }
        });
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let bind = |id: &str, action: fn(&mut Game)| match document.get_element_by_id(id) {
            Some(btn) => {
                let game = game.clone();
                listen(&btn, "click", move |_event: MouseEvent| {
                    action(&mut game.borrow_mut());
                });
            }
            None => log::debug!("No #{id} button on this page"),
        };

        bind("restart-btn", Game::request_restart);
        bind("play-again-btn", Game::request_restart);
        bind("close-btn", |g| g.overlay_dismissed = true);
        bind("sound-btn", Game::toggle_sound);
    }

    /// Stop the loop when the page goes away; resume if it comes back from cache
    fn setup_page_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        let g = game.clone();
        listen(&window, "pagehide", move |_event: Event| {
            let mut g = g.borrow_mut();
            g.stopped = true;
            if let (Some(handle), Some(window)) = (g.frame_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
            log::info!("Game loop stopped");
        });

        listen(&window, "pageshow", move |_event: Event| {
            let resume = {
                let mut g = game.borrow_mut();
                g.last_time = 0.0;
                g.clock.reset();
                std::mem::replace(&mut g.stopped, false)
            };
            if resume {
                log::info!("Game loop resumed");
                request_animation_frame(game.clone());
            }
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let handle_owner = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        handle_owner.borrow_mut().frame_handle = handle;
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            if g.stopped {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.sync_canvas_size();
            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
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
    log::info!("Watermelon Club (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    autoplay(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round headlessly, sweeping the drop cursor across the board
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64) {
    use watermelon_club::BestScores;
    use watermelon_club::consts::BOARD_WIDTH;
    use watermelon_club::platform::MemoryStore;
    use watermelon_club::sim::{GameEvent, GameState, TickInput, tick};

    /// Frames between drops, enough for most fruits to land
    const DROP_INTERVAL: u64 = 45;
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    let mut store = MemoryStore::new();
    let mut best = BestScores::load(&store);
    let mut state = GameState::new(seed);
    let mut drops = 0u32;
    let mut merges = 0u32;

    while state.is_running() && state.frame < MAX_FRAMES {
        let mut input = TickInput::default();
        if state.frame % DROP_INTERVAL == 0 {
            let lane = (drops as f32 * 97.0) % (BOARD_WIDTH - 80.0);
            input.cursor_x = Some(40.0 + lane);
            input.drop = true;
        }
        tick(&mut state, &input);

        for event in state.take_events() {
            match event {
                GameEvent::Dropped { .. } => drops += 1,
                GameEvent::Merged { tier, points, .. } => {
                    merges += 1;
                    log::debug!("Merged into tier {} (+{})", tier, points);
                }
                GameEvent::Won { score } | GameEvent::GameOver { score } => {
                    if best.record(score) {
                        best.save(&mut store);
                    }
                }
            }
        }
    }

    log::info!(
        "Seed {}: {} drops, {} merges, score {} after {} frames ({})",
        seed,
        drops,
        merges,
        state.score,
        state.frame,
        if state.is_running() { "still running" } else { "game over" }
    );
    println!("Final score: {} (best {})", state.score, best.best);
}
