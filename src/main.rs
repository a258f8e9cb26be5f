//! Rocket Math entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use rocket_math::audio::{AudioManager, SoundEffect};
    use rocket_math::consts::*;
    use rocket_math::platform::{dom, share as web_share};
    use rocket_math::renderer::SdfRenderState;
    use rocket_math::share::{FeedPayload, Route, ShareConfig, ShareView, og_tags, shareable_link};
    use rocket_math::sim::{AnswerOutcome, GameEvent, GameState, TickInput, tick};
    use rocket_math::{Session, Settings, Tuning};

    /// Seconds the wrong-answer shake class stays on a button
    const BUTTON_SHAKE_SECS: f32 = 0.4;

    const ANSWER_BUTTONS: [&str; 2] = ["answer-0", "answer-1"];

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Screen {
        Selection,
        Playing,
        Result,
    }

    /// Game instance holding all state
    struct Game {
        tuning: Tuning,
        settings: Settings,
        share_config: ShareConfig,
        state: GameState,
        session: Option<Session>,
        band_id: Option<String>,
        screen: Screen,
        render_state: Option<SdfRenderState>,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Button currently shaking and for how long
        shake: Option<(usize, f32)>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings, share_config: ShareConfig) -> Self {
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(seed, tuning.clone(), 0),
                tuning,
                settings,
                share_config,
                session: None,
                band_id: None,
                screen: Screen::Selection,
                render_state: None,
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                shake: None,
            }
        }

        fn share_view(&self) -> ShareView<'_> {
            let band = self
                .band_id
                .as_deref()
                .and_then(|id| self.tuning.band_by_id(id));
            match (self.screen, band, &self.session) {
                (Screen::Result, Some(band), Some(session)) => ShareView::Result {
                    band,
                    score: session.score,
                    total: session.total,
                },
                (Screen::Playing | Screen::Result, Some(band), _) => ShareView::Playing { band },
                _ => ShareView::Landing,
            }
        }

        fn route(&self) -> Route {
            match &self.band_id {
                Some(id) => Route::Band(id.clone()),
                None => Route::Landing,
            }
        }

        fn refresh_og_tags(&self) {
            web_share::apply_og_tags(&og_tags(&self.share_view(), &self.share_config));
        }

        fn show_screen(&mut self, screen: Screen) {
            self.screen = screen;
            dom::set_hidden("selection-screen", screen != Screen::Selection);
            dom::set_hidden("game-screen", screen != Screen::Playing);
            dom::set_hidden("result-screen", screen != Screen::Result);
        }

        /// Start a fresh run of the band with `band_id`
        fn start_band(&mut self, band_id: &str) {
            let Some(band) = self.tuning.band_by_id(band_id) else {
                log::warn!("Unknown band '{band_id}', showing selection");
                self.show_selection();
                return;
            };
            let start_level = band.min_level;

            self.state.load_level(start_level);
            self.session = Some(Session::new(self.tuning.questions_per_run));
            self.band_id = Some(band.id.clone());
            self.accumulator = 0.0;
            self.shake = None;

            log::info!("Starting '{}' at level {}", band_id, start_level);
            self.show_screen(Screen::Playing);
            self.refresh_question();
            self.refresh_og_tags();
        }

        fn show_selection(&mut self) {
            self.session = None;
            self.band_id = None;
            self.show_screen(Screen::Selection);
            web_share::push_route(&Route::Landing);
            self.refresh_og_tags();
        }

        fn show_result(&mut self) {
            let Some(session) = &self.session else { return };
            dom::set_text("final-score", &format!("{} / {}", session.score, session.total));
            if let Some(band) = self.band_id.as_deref().and_then(|id| self.tuning.band_by_id(id)) {
                dom::set_text("result-band", &band.name);
            }
            log::info!("Run complete: {}", session.result_text());

            self.show_screen(Screen::Result);
            self.refresh_og_tags();
            self.audio.play(SoundEffect::RunComplete);
        }

        fn refresh_question(&self) {
            let problem = &self.state.problem;
            dom::set_text("question", &problem.question);
            for (id, value) in ANSWER_BUTTONS.iter().zip(problem.candidates) {
                dom::set_text(id, &value.to_string());
            }
            dom::set_text("level", &(self.state.level + 1).to_string());
            if let Some(session) = &self.session {
                dom::set_text(
                    "question-number",
                    &format!("{} / {}", session.question_number(), session.total),
                );
            }
        }

        /// Answer button `index` was clicked
        fn answer(&mut self, index: usize) {
            if self.screen != Screen::Playing {
                return;
            }
            let outcome = self.state.select_candidate(index);
            if let Some(session) = self.session.as_mut() {
                session.record(outcome);
            }

            match outcome {
                AnswerOutcome::Correct => {
                    log::info!("Correct! Launching (level now {})", self.state.level);
                    self.audio.play(SoundEffect::Launch);
                }
                AnswerOutcome::Wrong => {
                    self.audio.play(SoundEffect::WrongAnswer);
                    if let Some(render_state) = self.render_state.as_mut() {
                        render_state.kick_shake(&self.settings);
                    }
                    if let Some((old, _)) = self.shake.take() {
                        dom::set_class(ANSWER_BUTTONS[old], "shake", false);
                    }
                    dom::set_class(ANSWER_BUTTONS[index], "shake", true);
                    self.shake = Some((index, BUTTON_SHAKE_SECS));
                }
                AnswerOutcome::Ignored => {}
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            // Idle mode only plays on the game screen; menus just spin the planet
            let input = TickInput {
                idle_mode: self.input.idle_mode && self.screen == Screen::Playing,
            };

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let events = tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in events {
                    self.handle_event(event);
                }
            }

            if let Some((index, remaining)) = self.shake.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    dom::set_class(ANSWER_BUTTONS[*index], "shake", false);
                    self.shake = None;
                }
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::Answered { outcome } => {
                    if let Some(session) = self.session.as_mut() {
                        session.record(outcome);
                    }
                    if outcome == AnswerOutcome::Correct {
                        self.audio.play(SoundEffect::Launch);
                    }
                }
                GameEvent::Impact { .. } => self.audio.play(SoundEffect::Explosion),
                GameEvent::ProblemReady { level } => {
                    log::debug!("Problem ready at level {}", level);
                    let finished = self.session.as_ref().is_some_and(|s| s.is_complete());
                    if self.screen == Screen::Playing && finished {
                        self.show_result();
                    } else {
                        if self.screen == Screen::Playing {
                            self.audio.play(SoundEffect::NextProblem);
                        }
                        self.refresh_question();
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
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

        /// Sync answer buttons with the controller's input gate
        fn update_hud(&self) {
            let disabled = !self.state.input_enabled || self.screen != Screen::Playing;
            for id in ANSWER_BUTTONS {
                dom::set_disabled(id, disabled);
            }
        }

        fn copy_link(&self) {
            match web_share::page_base_url() {
                Ok(base) => {
                    let link = shareable_link(&base, &self.route());
                    wasm_bindgen_futures::spawn_local(web_share::copy_link(link));
                }
                Err(e) => dom::alert(&e.to_string()),
            }
        }

        fn share(&self) {
            let result = web_share::page_base_url().and_then(|base| {
                let link = shareable_link(&base, &self.route());
                let payload = FeedPayload::new(&self.share_view(), &self.share_config, &link);
                web_share::share_feed(&payload)
            });
            if let Err(e) = result {
                log::warn!("Share failed: {e:?}");
                dom::alert(&e.to_string());
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.apply_settings(&self.settings);
            self.settings.save();
            log::info!("Muted: {}", self.settings.muted);
        }

        fn cycle_quality(&mut self) {
            self.settings.quality = self.settings.quality.next();
            self.settings.save();
            log::info!("Quality: {:?}", self.settings.quality);
        }

        /// React to the URL hash (initial load or `hashchange`)
        fn follow_hash(&mut self) {
            match Route::from_hash(&web_share::current_hash(), &self.tuning) {
                Route::Band(id) => self.start_band(&id),
                Route::Landing => self.show_selection(),
            }
        }
    }

    fn canvas_pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Rocket Math starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let (width, height) = canvas_pixel_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::load();
        let settings = Settings::load();
        let share_config = ShareConfig {
            image_url: web_share::og_image_url().unwrap_or_default(),
            ..ShareConfig::default()
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, settings, share_config)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match SdfRenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {e}");
                return;
            }
        }

        // Hide loading indicator
        dom::set_hidden("loading", true);

        web_share::init_sdk("share-btn");
        setup_band_buttons(game.clone());
        setup_answer_buttons(game.clone());
        setup_result_buttons(game.clone());
        setup_window_events(&canvas, game.clone());

        game.borrow_mut().follow_hash();

        // Start game loop
        request_animation_frame(game);

        log::info!("Rocket Math running!");
    }

    /// One start button per difficulty band
    fn setup_band_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = dom::document() else { return };
        let Some(list) = document.get_element_by_id("band-list") else {
            log::warn!("No #band-list element");
            return;
        };

        let bands = game.borrow().tuning.bands.clone();
        for band in bands {
            let Ok(btn) = document.create_element("button") else {
                continue;
            };
            btn.set_text_content(Some(&band.name));
            let _ = btn.set_attribute("class", "band-btn");
            let _ = btn.set_attribute("data-band", &band.id);

            let game = game.clone();
            let id = band.id.clone();
            dom::on_click(&btn, move |_event| {
                web_share::push_route(&Route::Band(id.clone()));
                game.borrow_mut().start_band(&id);
            });
            let _ = list.append_child(&btn);
        }
    }

    fn setup_answer_buttons(game: Rc<RefCell<Game>>) {
        for (index, id) in ANSWER_BUTTONS.iter().enumerate() {
            let game = game.clone();
            dom::on_click_id(id, move |_event| {
                game.borrow_mut().answer(index);
            });
        }
    }

    fn setup_result_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            dom::on_click_id("restart-btn", move |_event| {
                game.borrow_mut().show_selection();
            });
        }
        {
            let game = game.clone();
            dom::on_click_id("copy-link-btn", move |_event| {
                game.borrow().copy_link();
            });
        }
        dom::on_click_id("share-btn", move |_event| {
            game.borrow().share();
        });
    }

    fn setup_window_events(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Resize
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (width, height) = canvas_pixel_size(&canvas);
                canvas.set_width(width);
                canvas.set_height(height);
                if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                    render_state.resize(width, height);
                }
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Hash change (back button, edited URL, opened share link)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::HashChangeEvent| {
                game.borrow_mut().follow_hash();
            });
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "1" => g.answer(0),
                    "2" => g.answer(1),
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "m" | "M" => g.toggle_mute(),
                    "q" | "Q" => g.cycle_quality(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
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

/// Headless demo: plays one run in idle mode and logs each problem
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rocket_math::Tuning;
    use rocket_math::consts::SIM_DT;
    use rocket_math::session::Session;
    use rocket_math::sim::{AnswerOutcome, GameEvent, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rocket Math (native) starting...");
    log::info!("Native mode runs the simulation headless - run with `trunk serve` for the web version");

    let tuning = Tuning::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed, tuning.clone(), 0);
    let mut session = Session::new(tuning.questions_per_run);
    let input = TickInput::default();

    log::info!("Level {}: {}", state.level, state.problem.question);
    while !session.is_complete() {
        let outcome = state.select_answer(state.problem.answer);
        session.record(outcome);
        if outcome != AnswerOutcome::Correct {
            log::warn!("Unexpected outcome {:?}", outcome);
            break;
        }
        'flight: loop {
            for event in tick(&mut state, &input, SIM_DT) {
                if let GameEvent::ProblemReady { level } = event {
                    log::info!("Level {}: {}", level, state.problem.question);
                    break 'flight;
                }
            }
        }
    }

    println!("Result: {}", session.result_text());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
