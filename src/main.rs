//! Ballworks entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{DragEvent, Element, HtmlCanvasElement, MouseEvent};

    use ballworks::Tuning;
    use ballworks::consts::*;
    use ballworks::renderer::{RenderState, pipeline, scene_vertices};
    use ballworks::sim::{GameEvent, GameState, MaterialDrop, PointerEvent, TickInput, tick};

    /// Longest frame gap fed to the accumulator (tab switches, breakpoints)
    const MAX_FRAME_MS: f64 = 250.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f64,
        last_time: f64,
        /// Input gathered since the last tick
        input: TickInput,
        /// Last value written to the points HUD
        shown_points: Option<i64>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                state: GameState::new(seed, tuning),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                shown_points: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64) {
            self.accumulator += dt_ms.min(MAX_FRAME_MS);

            let mut substeps = 0;
            while self.accumulator >= TICK_MS && substeps < MAX_SUBSTEPS {
                // Input is consumed by the first substep only
                let input = std::mem::take(&mut self.input);
                tick(&mut self.state, &input, TICK_MS);
                self.accumulator -= TICK_MS;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                match event {
                    GameEvent::BallScored { ball, .. } => log::debug!("Ball {ball} scored"),
                    GameEvent::ScoreResolved { resolution, score } => {
                        log::info!("Window resolved: {resolution:?} (score {score:.0})")
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let vertices = scene_vertices(&self.state);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    log::warn!("Surface lost; reconfiguring and clearing the world");
                    render_state.resize(render_state.size.0, render_state.size.1);
                    self.state.clear();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let points = self.state.display_score();
            if self.shown_points == Some(points) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("points") {
                el.set_text_content(Some(&points.to_string()));
                self.shown_points = Some(points);
            }
        }
    }

    /// Pointer position in arena coordinates
    fn arena_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> glam::Vec2 {
        let size = (canvas.client_width() as u32, canvas.client_height() as u32);
        pipeline::screen_to_arena(size, event.offset_x() as f32, event.offset_y() as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ballworks starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::load();
        tuning.report();

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
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

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_pointer_handlers(&canvas, game.clone());
        setup_drop_target(&canvas, game.clone());
        setup_palette();
        setup_clear_button(game.clone());

        request_animation_frame(game);

        log::info!("Ballworks running!");
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = arena_point(&canvas_clone, &event);
                game.borrow_mut().input.pointer.push(PointerEvent::Down(point));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                // Only a held material cares where the pointer goes
                if g.state.drag.is_some() || !g.input.pointer.is_empty() {
                    let point = arena_point(&canvas_clone, &event);
                    g.input.pointer.push(PointerEvent::Move(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            // Released anywhere in the window, not just over the canvas
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer.push(PointerEvent::Up);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Accept palette items dropped onto the canvas
    fn setup_drop_target(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                // Required for the drop event to fire
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("dragover", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                event.prevent_default();
                let Some(kind) = event
                    .data_transfer()
                    .and_then(|dt| dt.get_data("text/plain").ok())
                else {
                    return;
                };
                let pos = arena_point(&canvas_clone, &event);
                game.borrow_mut().input.drops.push(MaterialDrop { kind, pos });
            });
            let _ = canvas.add_event_listener_with_callback("drop", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Make every `[data-material]` element a drag source carrying its type
    fn setup_palette() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(items) = document.query_selector_all("[data-material]") else {
            return;
        };

        for i in 0..items.length() {
            let Some(item) = items.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(kind) = item.get_attribute("data-material") else {
                continue;
            };
            let _ = item.set_attribute("draggable", "true");

            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                if let Some(dt) = event.data_transfer() {
                    let _ = dt.set_data("text/plain", &kind);
                }
            });
            let _ =
                item.add_event_listener_with_callback("dragstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_clear_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("clear-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.clear = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                TICK_MS
            };
            g.last_time = time;

            g.update(dt_ms);
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

/// Headless session: a fixed layout run for one simulated minute
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ballworks::Tuning;
    use ballworks::consts::TICK_MS;
    use ballworks::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Ballworks (native) starting...");
    log::info!("Rendering requires the web build; running a headless session");

    let tuning = Tuning::load();
    tuning.report();

    let seed = std::env::var("BALLWORKS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut state = GameState::new(seed, tuning);

    for (kind, x, y) in [
        ("PlankRight", 170.0, 180.0),
        ("Fan", 80.0, 460.0),
        ("Bumper", 420.0, 420.0),
        ("Vortex", 620.0, 160.0),
    ] {
        state.add_material(kind, x, y);
    }

    let input = TickInput::default();
    let ticks = (60_000.0 / TICK_MS).round() as u64;
    let mut scored = 0u32;

    for _ in 0..ticks {
        tick(&mut state, &input, TICK_MS);
        for event in state.drain_events() {
            match event {
                GameEvent::BallScored { .. } => scored += 1,
                GameEvent::ScoreResolved { resolution, score } => {
                    log::info!(
                        "[{:>6.0} ms] {resolution:?} -> score {score:.0}",
                        state.time_ms
                    );
                }
            }
        }
    }

    log::info!(
        "Session over: {} balls scored, {} live, final score {}",
        scored,
        state.balls.len(),
        state.display_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
