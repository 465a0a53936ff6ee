#![forbid(unsafe_code)]

//! Host-driven frame and timer queues.
//!
//! The page never reads a clock. The host calls
//! [`Page::run_animation_frame`](crate::Page::run_animation_frame) from its
//! `requestAnimationFrame` loop and
//! [`Page::advance_time`](crate::Page::advance_time) with elapsed wall time;
//! this module only keeps the queues and the virtual clock.
//!
//! # Invariants
//!
//! 1. A frame task requested while a frame batch runs waits for the next frame.
//! 2. Due timers fire in deadline order, ties broken by scheduling order.
//! 3. Cancelled frames and timers never fire.

use std::time::Duration;

use crate::focus::TrapId;
use crate::transition::WaitId;

/// Handle to a queued frame task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FrameId(u64);

/// Handle to a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TimerId(u64);

/// Work deferred to the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameTask {
    InitialFocus(TrapId),
    TransitionReady(WaitId),
}

/// Work deferred to a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerTask {
    TransitionFallback(WaitId),
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    deadline: Duration,
    task: TimerTask,
}

#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    now: Duration,
    next_id: u64,
    frames: Vec<(FrameId, FrameTask)>,
    timers: Vec<Timer>,
}

impl Scheduler {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn request_frame(&mut self, task: FrameTask) -> FrameId {
        let id = FrameId(self.next());
        self.frames.push((id, task));
        id
    }

    pub(crate) fn cancel_frame(&mut self, id: FrameId) -> bool {
        let before = self.frames.len();
        self.frames.retain(|(f, _)| *f != id);
        self.frames.len() != before
    }

    /// Ids of every frame task queued so far, in request order.
    pub(crate) fn frame_batch(&self) -> Vec<FrameId> {
        self.frames.iter().map(|(id, _)| *id).collect()
    }

    /// Remove and return a queued frame task, unless it was cancelled.
    pub(crate) fn take_frame(&mut self, id: FrameId) -> Option<FrameTask> {
        let idx = self.frames.iter().position(|(f, _)| *f == id)?;
        Some(self.frames.remove(idx).1)
    }

    pub(crate) fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn set_timeout(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next());
        self.timers.push(Timer {
            id,
            deadline: self.now + delay,
            task,
        });
        id
    }

    pub(crate) fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Remove and return the earliest timer whose deadline has passed.
    pub(crate) fn pop_due(&mut self) -> Option<TimerTask> {
        let now = self.now;
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id.0))
            .map(|(idx, _)| idx)?;
        Some(self.timers.remove(idx).task)
    }
}
