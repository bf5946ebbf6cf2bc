//! Game session lifecycle
//!
//! A [`Session`] owns one playthrough's world and input and decides the
//! authoritative phase:
//!
//! ```text
//! Idle --start--> Running --grid cleared--> Won
//!   ^                |  \---ball missed---> Lost
//!   +------stop------+
//! Won | Lost --start--> Running (fresh world)
//! ```
//!
//! Presentation code either polls [`Session::phase`] or registers a phase
//! listener; every accepted transition is also returned to the caller.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::sim::{InputState, KeyEvent, Rect, TickEvent, TickSignal, World, tick};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Not ticking: never started, or stopped with the world frozen
    #[default]
    Idle,
    /// Ticking every frame
    Running,
    /// All bricks destroyed
    Won,
    /// Ball fell past the paddle
    Lost,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Running => "Running",
            SessionPhase::Won => "Won",
            SessionPhase::Lost => "Lost",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::Lost)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the phase changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionCause {
    StartCommand,
    StopCommand,
    BrickGridCleared,
    BallMissedPaddle,
}

/// An accepted phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: SessionPhase,
    pub to: SessionPhase,
    pub cause: TransitionCause,
}

/// Callback invoked on every accepted transition
pub type PhaseListener = Box<dyn FnMut(&Transition)>;

/// Ball as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
}

/// Read-only view of the session for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub arena: Vec2,
    /// Ticks run in the current playthrough
    pub tick: u64,
    /// Absent until the first Start
    pub ball: Option<BallView>,
    pub paddle: Option<Rect>,
    /// Alive bricks only
    pub bricks: Vec<Rect>,
}

impl Snapshot {
    pub fn bricks_remaining(&self) -> usize {
        self.bricks.len()
    }
}

/// One playthrough plus the phase machine around it
pub struct Session {
    config: GameConfig,
    phase: SessionPhase,
    world: Option<World>,
    input: InputState,
    ticks: u64,
    last_events: Vec<TickEvent>,
    listener: Option<PhaseListener>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("ticks", &self.ticks)
            .field("input", &self.input)
            .field("world", &self.world)
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Session {
    /// Idle session. The config is checked on each Start, not here.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            phase: SessionPhase::Idle,
            world: None,
            input: InputState::default(),
            ticks: 0,
            last_events: Vec::new(),
            listener: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Current world; `None` before the first Start
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Ticks run since the last Start
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Events raised by the most recent tick
    pub fn last_events(&self) -> &[TickEvent] {
        &self.last_events
    }

    pub fn bricks_remaining(&self) -> Option<usize> {
        self.world.as_ref().map(|w| w.bricks.alive_count())
    }

    /// Register the phase-changed notification (replaces any previous one)
    pub fn set_phase_listener(&mut self, listener: impl FnMut(&Transition) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_phase_listener(&mut self) {
        self.listener = None;
    }

    /// Start command: rebuild everything and begin running.
    ///
    /// Accepted from any phase except Running (where it is a no-op). An
    /// invalid config rejects the command and leaves the session untouched.
    pub fn start(&mut self) -> Result<Option<Transition>, ConfigError> {
        if self.phase == SessionPhase::Running {
            log::debug!("Start ignored: already running");
            return Ok(None);
        }

        if let Err(e) = self.config.validate() {
            log::warn!("Start rejected: {e}");
            return Err(e);
        }

        self.world = Some(World::new(&self.config));
        self.input.clear();
        self.ticks = 0;
        self.last_events.clear();

        log::info!(
            "Session started ({}x{} bricks)",
            self.config.brick_columns,
            self.config.brick_rows
        );
        Ok(Some(self.transition(
            SessionPhase::Running,
            TransitionCause::StartCommand,
        )))
    }

    /// Stop command: freeze in place. Only meaningful while running.
    pub fn stop(&mut self) -> Option<Transition> {
        if self.phase != SessionPhase::Running {
            log::debug!("Stop ignored in phase {}", self.phase);
            return None;
        }
        Some(self.transition(SessionPhase::Idle, TransitionCause::StopCommand))
    }

    /// Run one simulation step. Does nothing unless running.
    pub fn tick(&mut self) -> Option<Transition> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        let world = self.world.as_mut()?;

        let outcome = tick(world, &self.input, &self.config);
        self.ticks += 1;

        for event in &outcome.events {
            if let TickEvent::BrickDestroyed { column, row } = event {
                log::debug!("Brick ({column}, {row}) destroyed at tick {}", self.ticks);
            }
        }
        self.last_events = outcome.events;

        match outcome.signal {
            TickSignal::None => None,
            TickSignal::BrickGridCleared => {
                Some(self.transition(SessionPhase::Won, TransitionCause::BrickGridCleared))
            }
            TickSignal::BallMissedPaddle => {
                Some(self.transition(SessionPhase::Lost, TransitionCause::BallMissedPaddle))
            }
        }
    }

    /// Apply a key event. Dropped unless running.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.input.apply(event);
        true
    }

    /// Host key-down by name; unrecognized keys are ignored
    pub fn key_down(&mut self, name: &str) -> bool {
        KeyEvent::key_down(name).is_some_and(|event| self.handle_key(event))
    }

    /// Host key-up by name; unrecognized keys are ignored
    pub fn key_up(&mut self, name: &str) -> bool {
        KeyEvent::key_up(name).is_some_and(|event| self.handle_key(event))
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        let world = self.world.as_ref();
        Snapshot {
            phase: self.phase,
            arena: self.config.arena_size(),
            tick: self.ticks,
            ball: world.map(|w| BallView {
                pos: w.ball.pos,
                radius: w.ball.radius,
            }),
            paddle: world.map(|w| w.paddle.rect()),
            bricks: world
                .map(|w| w.bricks.alive().map(|b| b.rect).collect())
                .unwrap_or_default(),
        }
    }

    fn transition(&mut self, to: SessionPhase, cause: TransitionCause) -> Transition {
        let transition = Transition {
            from: self.phase,
            to,
            cause,
        };
        self.phase = to;
        log::info!(
            "Phase {} -> {} ({:?}) after {} ticks",
            transition.from,
            transition.to,
            cause,
            self.ticks
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(&transition);
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MoveKey;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn started() -> Session {
        let mut session = Session::default();
        session.start().expect("default config is valid");
        session
    }

    /// Put the ball somewhere specific in a running session
    fn place_ball(session: &mut Session, pos: Vec2, vel: Vec2) {
        let world = session.world.as_mut().expect("started");
        world.ball.pos = pos;
        world.ball.vel = vel;
    }

    #[test]
    fn test_initial_state() {
        let session = Session::default();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.world().is_none());
        assert_eq!(session.bricks_remaining(), None);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(snapshot.ball.is_none());
        assert!(snapshot.paddle.is_none());
        assert!(snapshot.bricks.is_empty());
        assert_eq!(snapshot.arena, Vec2::new(480.0, 320.0));
    }

    #[test]
    fn test_start_transition() {
        let mut session = Session::default();
        let transition = session.start().expect("valid").expect("accepted");
        assert_eq!(
            transition,
            Transition {
                from: SessionPhase::Idle,
                to: SessionPhase::Running,
                cause: TransitionCause::StartCommand,
            }
        );

        let snapshot = session.snapshot();
        assert_eq!(snapshot.bricks_remaining(), 35);
        assert_eq!(
            snapshot.ball,
            Some(BallView {
                pos: Vec2::new(240.0, 290.0),
                radius: 10.0
            })
        );
        let paddle = snapshot.paddle.expect("paddle");
        assert_eq!(paddle.min, Vec2::new(202.5, 310.0));
        assert_eq!(paddle.size, Vec2::new(75.0, 10.0));
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut session = started();
        session.tick();
        assert_eq!(session.start(), Ok(None));
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn test_stop_freezes_without_reset() {
        let mut session = started();
        for _ in 0..5 {
            session.tick();
        }
        let before = session.snapshot();

        let transition = session.stop().expect("accepted");
        assert_eq!(transition.to, SessionPhase::Idle);
        assert_eq!(transition.cause, TransitionCause::StopCommand);

        // Ticks are inert while idle
        assert_eq!(session.tick(), None);
        let after = session.snapshot();
        assert_eq!(after.ball, before.ball);
        assert_eq!(after.tick, 5);
        assert_eq!(after.phase, SessionPhase::Idle);

        // Stop is only valid while running
        assert_eq!(session.stop(), None);
    }

    #[test]
    fn test_restart_after_stop_resets() {
        let mut session = started();
        session.key_down("ArrowRight");
        for _ in 0..5 {
            session.tick();
        }
        session.stop();
        session.start().expect("valid");

        assert_eq!(session.ticks(), 0);
        assert_eq!(*session.input(), InputState::default());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.ball.map(|b| b.pos), Some(Vec2::new(240.0, 290.0)));
        assert_eq!(snapshot.paddle.map(|p| p.min.x), Some(202.5));
    }

    #[test]
    fn test_loss_then_restart() {
        let mut session = started();
        place_ball(&mut session, Vec2::new(30.0, 309.0), Vec2::new(2.0, 2.0));

        let transition = session.tick().expect("terminal");
        assert_eq!(transition.to, SessionPhase::Lost);
        assert_eq!(transition.cause, TransitionCause::BallMissedPaddle);

        // Frozen: no further movement, stop ignored
        let frozen = session.snapshot();
        assert_eq!(session.tick(), None);
        assert_eq!(session.stop(), None);
        assert_eq!(session.snapshot(), frozen);
        assert_eq!(frozen.ball.map(|b| b.pos), Some(Vec2::new(30.0, 309.0)));

        let transition = session.start().expect("valid").expect("accepted");
        assert_eq!(transition.from, SessionPhase::Lost);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.bricks_remaining(), Some(35));
    }

    #[test]
    fn test_win_stops_updates() {
        let config = GameConfig {
            brick_columns: 1,
            brick_rows: 1,
            ..Default::default()
        };
        let mut session = Session::new(config);
        session.start().expect("valid");
        place_ball(&mut session, Vec2::new(60.0, 40.0), Vec2::new(2.0, -2.0));

        let transition = session.tick().expect("terminal");
        assert_eq!(transition.to, SessionPhase::Won);
        assert_eq!(
            session.last_events(),
            &[TickEvent::BrickDestroyed { column: 0, row: 0 }]
        );

        let won = session.snapshot();
        assert!(won.bricks.is_empty());
        for _ in 0..10 {
            assert_eq!(session.tick(), None);
        }
        assert_eq!(session.snapshot(), won);
        assert_eq!(session.phase(), SessionPhase::Won);
    }

    #[test]
    fn test_invalid_config_rejects_start() {
        let config = GameConfig {
            arena_width: 0.0,
            ..Default::default()
        };
        let mut session = Session::new(config);
        assert!(matches!(
            session.start(),
            Err(ConfigError::NonPositive {
                field: "arena_width",
                ..
            })
        ));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.world().is_none());
    }

    #[test]
    fn test_oversized_grid_rejects_start() {
        let config = GameConfig {
            arena_width: 1e30,
            arena_height: 1e30,
            brick_columns: 70_000,
            brick_rows: 70_000,
            ..Default::default()
        };
        let mut session = Session::new(config);
        assert!(matches!(
            session.start(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.world().is_none());
    }

    #[test]
    fn test_keys_only_while_running() {
        let mut session = Session::default();
        assert!(!session.key_down("ArrowLeft"));
        assert!(!session.input().left_pressed);

        session.start().expect("valid");
        assert!(session.key_down("Left"));
        assert!(session.input().left_pressed);
        assert!(!session.key_down("Escape"));
        assert!(session.key_up("ArrowLeft"));
        assert!(!session.input().is_pressed(MoveKey::Left));
    }

    #[test]
    fn test_holding_right_moves_paddle() {
        let mut session = started();
        session.key_down("ArrowRight");
        for _ in 0..10 {
            session.tick();
        }
        let paddle = session.snapshot().paddle.expect("paddle");
        assert_eq!(paddle.min.x, 272.5);
    }

    #[test]
    fn test_phase_listener_sees_every_transition() {
        let seen: Rc<RefCell<Vec<Transition>>> = Rc::new(RefCell::new(Vec::new()));
        let mut session = Session::default();
        {
            let seen = seen.clone();
            session.set_phase_listener(move |t| seen.borrow_mut().push(*t));
        }

        session.start().expect("valid");
        session.stop();
        session.stop();
        session.start().expect("valid");
        place_ball(&mut session, Vec2::new(30.0, 309.0), Vec2::new(2.0, 2.0));
        session.tick();

        // Detached listeners miss later transitions
        session.clear_phase_listener();
        session.start().expect("valid");

        let causes: Vec<_> = seen.borrow().iter().map(|t| t.cause).collect();
        assert_eq!(
            causes,
            vec![
                TransitionCause::StartCommand,
                TransitionCause::StopCommand,
                TransitionCause::StartCommand,
                TransitionCause::BallMissedPaddle,
            ]
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = started();
        let json = serde_json::to_string(&session.snapshot()).expect("serialize");
        let back: Snapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.phase, SessionPhase::Running);
        assert_eq!(back.bricks.len(), 35);
    }
}
