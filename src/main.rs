//! Rally Pong entry point
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
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use rally_pong::audio::AudioManager;
    use rally_pong::consts::*;
    use rally_pong::input::Key;
    use rally_pong::renderer::RenderState;
    use rally_pong::{App, FrameOutcome, Settings};

    /// Game instance plus the browser-side resources it draws with
    struct Game {
        app: App,
        render_state: Option<RenderState>,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks; false once the game asked to exit
        fn update(&mut self, time: f64) -> bool {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.app.frame(dt, time) == FrameOutcome::Continue
        }

        /// Render the current frame
        fn render(&mut self) {
            let Game {
                app, render_state, ..
            } = self;
            let Some(render_state) = render_state else {
                return;
            };

            match render_state.render(app.draw()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    fn js_error(msg: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&msg.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Rally Pong starting...");

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_error("no canvas"))?
            .dyn_into()?;
        let (width, height) = fit_canvas(&window, &canvas);

        // Write back so sanitized values and new fields are persisted
        let settings = Settings::load();
        settings.save();
        let audio = AudioManager::new(&settings);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            app: App::new(seed, settings, Box::new(audio)),
            render_state: None,
            last_time: 0.0,
        }));

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_error)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_error)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        )
        .await
        .map_err(js_error)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, game.clone());
        setup_resize_handler(&window, &canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Rally Pong running!");
        Ok(())
    }

    /// Size the canvas backing store to its CSS size at device resolution
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    event.prevent_default();
                    game.borrow_mut().app.input_mut().key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().app.input_mut().key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-up events for held keys will never arrive
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().app.input_mut().release_all();
                log::debug!("Window blurred, released held keys");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        let window_clone = window.clone();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&window_clone, &canvas);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();
            if !g.update(time) {
                log::info!("Rally Pong exited");
                return;
            }
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native_game {
    use std::sync::Arc;
    use std::time::Instant;

    use glam::Vec2;
    use winit::application::ApplicationHandler;
    use winit::event::{ElementState, WindowEvent};
    use winit::event_loop::ActiveEventLoop;
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::window::{Window, WindowId};

    use rally_pong::audio;
    use rally_pong::consts::*;
    use rally_pong::input::Key;
    use rally_pong::renderer::{RenderError, RenderState};
    use rally_pong::{App, FrameOutcome, Settings};

    /// winit event handler driving one [`App`]
    pub struct Runner {
        app: App,
        window: Option<Arc<Window>>,
        render_state: Option<RenderState>,
        started: Instant,
        last_frame: Option<Instant>,
        /// Startup failure reported once the event loop returns
        error: Option<anyhow::Error>,
    }

    impl Runner {
        pub fn new(seed: u64, settings: Settings) -> Self {
            let sink = audio::native_output(&settings);
            Self {
                app: App::new(seed, settings, sink),
                window: None,
                render_state: None,
                started: Instant::now(),
                last_frame: None,
                error: None,
            }
        }

        /// Outcome of the run after the event loop has returned
        pub fn finish(self) -> anyhow::Result<()> {
            match self.error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        fn elapsed_ms(&self) -> f64 {
            self.started.elapsed().as_secs_f64() * 1000.0
        }

        fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
            let attrs = Window::default_attributes()
                .with_title("Rally Pong")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    SCREEN_WIDTH as f64,
                    SCREEN_HEIGHT as f64,
                ));

            let window = Arc::new(event_loop.create_window(attrs)?);
            let size = window.inner_size();

            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let surface = instance
                .create_surface(window.clone())
                .map_err(RenderError::from)?;

            let adapter = pollster::block_on(instance.request_adapter(
                &wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                },
            ))
            .map_err(RenderError::from)?;

            log::info!("Using adapter: {:?}", adapter.get_info().name);

            let render_state = pollster::block_on(RenderState::new(
                surface,
                &adapter,
                size.width,
                size.height,
                Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            ))?;

            window.request_redraw();
            self.window = Some(window);
            self.render_state = Some(render_state);
            Ok(())
        }

        fn handle_key(&mut self, code: KeyCode, state: ElementState) {
            let Some(key) = map_key(code) else { return };
            let input = self.app.input_mut();
            match state {
                ElementState::Pressed => input.key_down(key),
                ElementState::Released => input.key_up(key),
            }
        }

        fn handle_close(&mut self, event_loop: &ActiveEventLoop) {
            self.app.input_mut().request_quit();
            // One full tick so the quit is consumed right away
            let time = self.elapsed_ms();
            if self.app.frame(SIM_DT, time) == FrameOutcome::Exit {
                event_loop.exit();
            }
        }

        fn handle_redraw(&mut self, event_loop: &ActiveEventLoop) {
            let now = Instant::now();
            let dt = self
                .last_frame
                .map_or(SIM_DT, |last| now.duration_since(last).as_secs_f32());
            self.last_frame = Some(now);

            let time = self.elapsed_ms();
            if self.app.frame(dt, time) == FrameOutcome::Exit {
                event_loop.exit();
                return;
            }

            let Some(render_state) = &mut self.render_state else {
                return;
            };
            match render_state.render(self.app.draw()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {e:?}"),
            }

            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    impl ApplicationHandler for Runner {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            if let Err(e) = self.init_graphics(event_loop) {
                log::error!("Graphics initialization failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            _id: WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested => self.handle_close(event_loop),
                WindowEvent::Resized(size) => {
                    if let Some(render_state) = &mut self.render_state {
                        render_state.resize(size.width, size.height);
                    }
                }
                WindowEvent::Focused(false) => self.app.input_mut().release_all(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(code, event.state);
                    }
                }
                WindowEvent::RedrawRequested => self.handle_redraw(event_loop),
                _ => {}
            }
        }
    }

    fn map_key(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::Digit3 | KeyCode::Numpad3 => Some(Key::Digit3),
            KeyCode::Digit5 | KeyCode::Numpad5 => Some(Key::Digit5),
            KeyCode::Digit7 | KeyCode::Numpad7 => Some(Key::Digit7),
            KeyCode::Escape => Some(Key::Escape),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rally Pong (native) starting...");

    let settings = rally_pong::Settings::load();
    // Writes defaults out on first run so they can be edited
    settings.save();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    let event_loop = winit::event_loop::EventLoop::new()?;
    let mut runner = native_game::Runner::new(seed, settings);
    event_loop.run_app(&mut runner)?;

    log::info!("Rally Pong exited");
    runner.finish()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
