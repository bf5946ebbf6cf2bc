//! Brick Breaker entry point
//!
//! In the browser this wires the canvas, keyboard and buttons to a frame loop
//! driven by `requestAnimationFrame`. Natively it runs the same session
//! headless from the command line.

use brick_breaker::sim::autopilot;
use brick_breaker::{FrameLoop, FrameScheduler};

/// Feed the autopilot's key events into the loop before the next frame
fn drive_autopilot<S: FrameScheduler>(frames: &mut FrameLoop<S>) {
    let Some(world) = frames.session().world() else {
        return;
    };
    let events = autopilot::steer(world, frames.session().input());
    for event in events {
        frames.handle_key(event);
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use brick_breaker::renderer::RenderState;
    use brick_breaker::sim::{KeyEvent, MoveKey};
    use brick_breaker::{
        FrameLoop, FrameOutcome, FrameScheduler, FrameToken, GameConfig, Session, SessionPhase,
    };

    /// Animation frames from the browser window
    struct RafScheduler {
        game: Weak<RefCell<Game>>,
    }

    impl FrameScheduler for RafScheduler {
        /// Browser request id, if the request went through
        type Handle = Option<i32>;

        fn request_frame(&mut self, token: FrameToken) -> Option<i32> {
            let game = self.game.clone();
            let callback = Closure::once_into_js(move |_time: f64| {
                animation_frame(game, token);
            });
            let window = web_sys::window()?;
            match window.request_animation_frame(callback.unchecked_ref()) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {e:?}");
                    None
                }
            }
        }

        fn cancel_frame(&mut self, handle: Option<i32>) {
            if let (Some(id), Some(window)) = (handle, web_sys::window()) {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame({id}) failed: {e:?}");
                }
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        frames: FrameLoop<RafScheduler>,
        render_state: Option<RenderState>,
        autopilot: bool,
    }

    impl Game {
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let snapshot = self.frames.session().snapshot();
            match render_state.render(&snapshot) {
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

        fn toggle_autopilot(&mut self) {
            self.autopilot = !self.autopilot;
            if !self.autopilot {
                // Let go of whatever the autopilot was holding
                for key in [MoveKey::Left, MoveKey::Right] {
                    self.frames.handle_key(KeyEvent::Released(key));
                }
            }
            log::info!("Autopilot: {}", self.autopilot);
        }
    }

    fn animation_frame(game: Weak<RefCell<Game>>, token: FrameToken) {
        // The page tore the game down; nothing left to tick
        let Some(game) = game.upgrade() else {
            return;
        };
        let mut g = game.borrow_mut();

        if g.autopilot && g.frames.pending_token() == Some(token) {
            super::drive_autopilot(&mut g.frames);
        }
        if let FrameOutcome::Ticked(_) = g.frames.on_frame(token) {
            g.render();
        }
    }

    fn status_text(phase: SessionPhase) -> &'static str {
        match phase {
            SessionPhase::Idle => "Press Start to play",
            SessionPhase::Running => "",
            SessionPhase::Won => "Congratulations! You Won!",
            SessionPhase::Lost => "Game Over! Try Again.",
        }
    }

    fn show_status(phase: SessionPhase) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("status") {
            el.set_text_content(Some(status_text(phase)));
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Brick Breaker starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig::default();
        canvas.set_width(config.arena_width as u32);
        canvas.set_height(config.arena_height as u32);
        let (width, height) = (canvas.width(), canvas.height());

        let mut session = Session::new(config);
        session.set_phase_listener(|transition| show_status(transition.to));
        show_status(session.phase());

        let game = Rc::new_cyclic(|weak| {
            RefCell::new(Game {
                frames: FrameLoop::new(session, RafScheduler { game: weak.clone() }),
                render_state: None,
                autopilot: false,
            })
        });

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        {
            let mut g = game.borrow_mut();
            g.render_state = Some(render_state);
            g.render();
        }

        setup_keyboard(game.clone())?;
        setup_buttons(game.clone())?;

        log::info!("Brick Breaker ready");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if key == "i" || key == "I" {
                    g.toggle_autopilot();
                } else if g.frames.key_down(&key) {
                    // Arrow keys would otherwise scroll the page
                    event.prevent_default();
                }
            });
            document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().frames.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                match g.frames.start() {
                    Ok(_) => g.render(),
                    Err(e) => log::error!("Cannot start: {e}"),
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("stop-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().frames.stop();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e:?}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use anyhow::{Context, Result};
    use clap::Parser;

    use brick_breaker::consts::FRAME_INTERVAL_SECS;
    use brick_breaker::{FrameLoop, QueueScheduler, Session, SessionPhase};

    /// Play Brick Breaker without a window
    #[derive(Parser, Debug)]
    #[command(name = "brick-breaker", version, about)]
    pub struct Cli {
        /// Stop the session after this many ticks
        #[arg(long, default_value_t = 100_000)]
        pub max_ticks: u64,

        /// Pace ticks at 60 per second instead of running flat out
        #[arg(long)]
        pub realtime: bool,

        /// Leave the paddle alone (the ball will be missed)
        #[arg(long)]
        pub no_autopilot: bool,

        /// Print the final snapshot as JSON
        #[arg(long)]
        pub json: bool,
    }

    pub fn run(cli: Cli) -> Result<SessionPhase> {
        let scheduler = if cli.realtime {
            QueueScheduler::paced(Duration::from_secs_f64(FRAME_INTERVAL_SECS))
        } else {
            QueueScheduler::new()
        };
        let mut frames = FrameLoop::new(Session::default(), scheduler);
        frames.start().context("starting session")?;

        while frames.session().is_running() {
            if frames.session().ticks() >= cli.max_ticks {
                log::warn!("Tick limit {} reached, stopping", cli.max_ticks);
                frames.stop();
                break;
            }
            if !cli.no_autopilot {
                super::drive_autopilot(&mut frames);
            }
            if frames.pump().is_none() {
                break;
            }
        }

        let snapshot = frames.session().snapshot();
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?
            );
        } else {
            println!(
                "{} after {} ticks, {} bricks remaining",
                snapshot.phase,
                snapshot.tick,
                snapshot.bricks_remaining()
            );
        }
        Ok(snapshot.phase)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_geometry_is_not_a_flag() {
            assert!(Cli::try_parse_from(["brick-breaker", "--config", "layout.json"]).is_err());

            let cli = Cli::try_parse_from(["brick-breaker", "--max-ticks", "50", "--no-autopilot"])
                .expect("valid flags");
            assert_eq!(cli.max_ticks, 50);
            assert!(cli.no_autopilot);
        }

        #[test]
        fn test_run_stops_at_tick_limit() {
            let cli = Cli::try_parse_from(["brick-breaker", "--max-ticks", "20"]).expect("valid");
            assert_eq!(run(cli).expect("runs"), SessionPhase::Idle);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brick Breaker (headless) starting...");

    let cli = headless::Cli::parse();
    let phase = headless::run(cli)?;
    log::info!("Finished in phase {phase}");
    Ok(())
}
