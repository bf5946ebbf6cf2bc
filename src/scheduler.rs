//! Frame driving
//!
//! The simulation never schedules itself. A host facility (the browser's
//! animation frames, or a paced queue natively) calls back once per frame.
//! [`FrameLoop`] keeps at most one frame requested at a time and hands out a
//! fresh [`FrameToken`] per request, so a callback that was cancelled or
//! superseded is recognized and dropped instead of ticking.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::ConfigError;
use crate::session::{Session, Transition};
use crate::sim::KeyEvent;

/// Identifies one frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Host facility that calls back once per displayed frame
pub trait FrameScheduler {
    /// Whatever the host needs to cancel a request
    type Handle;

    /// Ask for one callback carrying `token`
    fn request_frame(&mut self, token: FrameToken) -> Self::Handle;

    /// Withdraw a request. Hosts that cannot withdraw may still deliver the
    /// token later; the frame loop ignores it.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// What a delivered frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Token was cancelled or superseded; nothing ran
    Stale,
    /// One tick ran; carries the phase change it caused, if any
    Ticked(Option<Transition>),
}

/// A session wired to a frame scheduler
pub struct FrameLoop<S: FrameScheduler> {
    session: Session,
    scheduler: S,
    pending: Option<(FrameToken, S::Handle)>,
    next_token: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(session: Session, scheduler: S) -> Self {
        Self {
            session,
            scheduler,
            pending: None,
            next_token: 1,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Token of the one frame allowed to tick next
    pub fn pending_token(&self) -> Option<FrameToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }

    /// Start command; on success the first frame is requested
    pub fn start(&mut self) -> Result<Option<Transition>, ConfigError> {
        let transition = self.session.start()?;
        if transition.is_some() {
            self.cancel_pending();
            self.request_next();
        }
        Ok(transition)
    }

    /// Stop command; the pending frame is withdrawn before this returns
    pub fn stop(&mut self) -> Option<Transition> {
        let transition = self.session.stop();
        self.cancel_pending();
        transition
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        self.session.handle_key(event)
    }

    pub fn key_down(&mut self, name: &str) -> bool {
        self.session.key_down(name)
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        self.session.key_up(name)
    }

    /// Scheduler callback. Runs exactly one tick for the current token and
    /// requests the following frame only while the session keeps running.
    pub fn on_frame(&mut self, token: FrameToken) -> FrameOutcome {
        match self.pending {
            Some((current, _)) if current == token => {
                self.pending = None;
            }
            _ => {
                log::debug!("Dropping stale frame {}", token.raw());
                return FrameOutcome::Stale;
            }
        }

        let transition = self.session.tick();
        if self.session.is_running() {
            self.request_next();
        }
        FrameOutcome::Ticked(transition)
    }

    fn request_next(&mut self) {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        let handle = self.scheduler.request_frame(token);
        self.pending = Some((token, handle));
    }

    fn cancel_pending(&mut self) {
        if let Some((token, handle)) = self.pending.take() {
            log::trace!("Cancelling frame {}", token.raw());
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Single-threaded queue of requested frames, optionally paced to a fixed
/// interval
#[derive(Debug, Default)]
pub struct QueueScheduler {
    queue: VecDeque<FrameToken>,
    interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl QueueScheduler {
    /// Deliver frames as fast as they are pulled
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver at most one frame per `interval`
    pub fn paced(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
            ..Self::default()
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Next requested frame, sleeping first if pacing requires it
    pub fn next_due(&mut self) -> Option<FrameToken> {
        let token = self.queue.pop_front()?;
        if let (Some(interval), Some(last)) = (self.interval, self.last_frame) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
        Some(token)
    }
}

impl FrameScheduler for QueueScheduler {
    type Handle = FrameToken;

    fn request_frame(&mut self, token: FrameToken) -> FrameToken {
        self.queue.push_back(token);
        token
    }

    fn cancel_frame(&mut self, handle: FrameToken) {
        self.queue.retain(|t| *t != handle);
    }
}

impl FrameLoop<QueueScheduler> {
    /// Deliver the next queued frame, if any
    pub fn pump(&mut self) -> Option<FrameOutcome> {
        let token = self.scheduler.next_due()?;
        Some(self.on_frame(token))
    }
}
