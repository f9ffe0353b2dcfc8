//! Cooperative, cancelable frame loop.
//!
//! The host (a browser's animation-frame queue, or a test double) implements
//! [`FrameScheduler`]. [`FrameLoop`] re-arms itself after every frame body
//! unless its [`CancelToken`] has fired, and [`FrameLoop::stop`] revokes any
//! frame that is already queued.

use std::cell::Cell;
use std::rc::Rc;

/// Shared single-threaded cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Something that can run a callback on the next display frame.
pub trait FrameScheduler {
    type Handle: Copy;

    /// Queue the next frame. `None` means the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    token: CancelToken,
    pending: Option<S::Handle>,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            token: CancelToken::new(),
            pending: None,
            frames: 0,
        }
    }

    /// Request the first frame. No-op when already armed or stopped.
    pub fn start(&mut self) {
        if self.token.is_cancelled() || self.pending.is_some() {
            return;
        }
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            log::warn!("[frame] host refused the first frame request");
        }
    }

    /// Run one frame: `body` only if still live, then re-arm only if still live.
    ///
    /// Returns whether the body ran.
    pub fn on_frame(&mut self, body: impl FnOnce()) -> bool {
        self.pending = None;
        if self.token.is_cancelled() {
            return false;
        }
        body();
        self.frames += 1;
        if !self.token.is_cancelled() {
            self.pending = self.scheduler.request_frame();
        }
        true
    }

    /// Cancel the loop and any queued frame. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let first = !self.token.is_cancelled();
        self.token.cancel();
        if let Some(h) = self.pending.take() {
            self.scheduler.cancel_frame(h);
        }
        if first {
            log::debug!("[frame] loop stopped after {} frames", self.frames);
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        next: u32,
        requested: u32,
        cancelled: Vec<u32>,
    }

    impl FrameScheduler for Counting {
        type Handle = u32;

        fn request_frame(&mut self) -> Option<u32> {
            self.requested += 1;
            self.next += 1;
            Some(self.next)
        }

        fn cancel_frame(&mut self, handle: u32) {
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn rearms_after_each_frame() {
        let mut l = FrameLoop::new(Counting::default());
        l.start();
        l.start();
        assert_eq!(l.scheduler().requested, 1);
        for _ in 0..3 {
            assert!(l.on_frame(|| {}));
        }
        assert_eq!(l.scheduler().requested, 4);
        assert_eq!(l.frames(), 3);
        assert!(l.is_armed());
    }

    #[test]
    fn cancel_inside_body_does_not_rearm() {
        let mut l = FrameLoop::new(Counting::default());
        l.start();
        let token = l.token();
        assert!(l.on_frame(|| token.cancel()));
        assert!(!l.is_armed());
        assert_eq!(l.scheduler().requested, 1);
    }

    #[test]
    fn stop_revokes_pending_frame_once() {
        let mut l = FrameLoop::new(Counting::default());
        l.start();
        l.stop();
        l.stop();
        assert_eq!(l.scheduler().cancelled, vec![1]);
        assert!(!l.on_frame(|| panic!("body ran after stop")));
        l.start();
        assert_eq!(l.scheduler().requested, 1);
    }
}
