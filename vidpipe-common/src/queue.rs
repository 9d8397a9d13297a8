use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::Frame;

struct State {
    items: VecDeque<Frame>,
    max_size: usize,
    closed: bool,
}

/// A bounded, blocking FIFO of [`Frame`]s connecting two execution nodes.
///
/// This is the one piece of shared mutable state between workers (spec §5):
/// a deque guarded by a single mutex with two condition variables, one
/// signaled when the queue becomes non-empty and one when it becomes
/// non-full. `push` blocks while the queue is full; `try_pop` never blocks,
/// returning `None` immediately when the queue is drained so a worker can
/// cooperatively check its shutdown flag instead of sleeping forever on an
/// empty queue (spec §4.4, §5).
///
/// Ownership of a pushed frame transfers to the queue; a popped frame's
/// ownership transfers to the caller. Order is strict FIFO.
pub struct FrameQueue {
    state: Mutex<State>,
    not_empty: Condvar,
    not_full: Condvar,
}

/// Returned by [`FrameQueue::push`] when the queue was closed (runtime
/// shutdown) while the caller was blocked waiting for room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueClosed;

impl FrameQueue {
    /// Creates a queue bounded at `max_size` frames. A non-positive capacity
    /// is floored to 1, matching the spec's invariant that queue bounds are
    /// strictly positive.
    pub fn new(max_size: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                max_size: max_size.max(1),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.state.lock().unwrap().max_size
    }

    /// The number of frames currently queued.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// True when the queue holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pushes `frame`, blocking while the queue is full.
    ///
    /// Returns [`QueueClosed`] without pushing if the queue was closed
    /// (directly, or while this call was blocked waiting for room) — the
    /// shutdown path in spec §7 requires a blocked pusher to unblock and
    /// observe shutdown rather than wait forever.
    pub fn push(&self, frame: Frame) -> Result<(), QueueClosed> {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.closed {
                return Err(QueueClosed);
            }
            if state.items.len() < state.max_size {
                break;
            }
            state = self.not_full.wait(state).unwrap();
        }
        state.items.push_back(frame);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Pops the oldest frame without blocking; `None` if the queue is
    /// currently empty (whether or not it has been closed).
    pub fn try_pop(&self) -> Option<Frame> {
        let mut state = self.state.lock().unwrap();
        let frame = state.items.pop_front();
        if frame.is_some() {
            self.not_full.notify_one();
        }
        frame
    }

    /// Marks the queue closed and wakes every thread blocked in `push`, so
    /// shutdown latency is bounded even with a producer stalled on a full
    /// downstream queue (spec §7, "Queue full at shutdown").
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        drop(state);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Discards any frames left in the queue, dropping them along with their
    /// buffers. Called once a pipeline has been stopped and joined.
    pub fn drain_on_shutdown(&self) {
        self.state.lock().unwrap().items.clear();
    }
}
