//! Timer and frame-callback scheduling
//!
//! Everything runs on the UI thread. Callbacks are queued, never run
//! re-entrantly from inside `schedule`, so callers may hold a borrow while
//! scheduling but must not hold one across a dispatch.

use std::cell::RefCell;

/// Deferred work
pub type Task = Box<dyn FnOnce()>;
/// Work for the next display refresh; receives the frame timestamp (ms)
pub type FrameTask = Box<dyn FnOnce(f64)>;

/// Handle for a pending timer or frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub i32);

/// Injectable scheduling capability
pub trait Scheduler {
    /// Run `task` after `delay_ms`. `None` if the platform refused.
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TimerId>;
    /// Cancel a pending timer. Unknown or fired ids are ignored.
    fn cancel(&self, id: TimerId);
    /// Run `task` on the next frame
    fn schedule_frame(&self, task: FrameTask) -> Option<TimerId>;
    fn cancel_frame(&self, id: TimerId);
}

struct PendingTimer {
    id: TimerId,
    due: f64,
    task: Task,
}

#[derive(Default)]
struct ManualInner {
    now: f64,
    next_id: i32,
    timers: Vec<PendingTimer>,
    frames: Vec<(TimerId, FrameTask)>,
}

impl ManualInner {
    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

/// Virtual-clock scheduler: time only moves when `advance` is called
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<ManualInner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    /// Move the clock forward, firing due timers in (due time, id) order.
    /// Timers scheduled by a firing task run too if they fall inside the span.
    pub fn advance(&self, ms: u32) {
        let target = self.inner.borrow().now + f64::from(ms);
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let idx = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by(|(_, a), (_, b)| {
                        a.due
                            .partial_cmp(&b.due)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(a.id.cmp(&b.id))
                    })
                    .map(|(i, _)| i);
                idx.map(|i| {
                    let timer = inner.timers.remove(i);
                    inner.now = timer.due;
                    timer.task
                })
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }

    /// Run the frame callbacks armed before this call. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let (frames, now) = {
            let mut inner = self.inner.borrow_mut();
            (std::mem::take(&mut inner.frames), inner.now)
        };
        let count = frames.len();
        for (_, task) in frames {
            task(now);
        }
        count
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TimerId> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.allocate();
        let due = inner.now + f64::from(delay_ms);
        inner.timers.push(PendingTimer { id, due, task });
        Some(id)
    }

    fn cancel(&self, id: TimerId) {
        self.inner.borrow_mut().timers.retain(|t| t.id != id);
    }

    fn schedule_frame(&self, task: FrameTask) -> Option<TimerId> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.allocate();
        inner.frames.push((id, task));
        Some(id)
    }

    fn cancel_frame(&self, id: TimerId) {
        self.inner.borrow_mut().frames.retain(|(f, _)| *f != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_timers_fire_in_order() {
        let sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(300, "c"), (100, "a"), (200, "b"), (100, "a2")] {
            let log = log.clone();
            sched.schedule(delay, Box::new(move || log.borrow_mut().push(tag)));
        }

        sched.advance(150);
        assert_eq!(*log.borrow(), vec!["a", "a2"]);
        sched.advance(1000);
        assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
        assert_eq!(sched.now(), 1150.0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let sched = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        let id = sched.schedule(10, Box::new(move || *f.borrow_mut() = true)).unwrap();
        sched.cancel(id);
        sched.advance(100);
        assert!(!*fired.borrow());
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_chained_timer_within_span() {
        let sched = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let (s, l) = (sched.clone(), log.clone());
        sched.schedule(
            100,
            Box::new(move || {
                l.borrow_mut().push(s.now());
                let l2 = l.clone();
                let s2 = s.clone();
                s.schedule(50, Box::new(move || l2.borrow_mut().push(s2.now())));
            }),
        );

        sched.advance(200);
        assert_eq!(*log.borrow(), vec![100.0, 150.0]);
    }

    #[test]
    fn test_frames_armed_during_frame_wait() {
        let sched = Rc::new(ManualScheduler::new());
        let s = sched.clone();
        sched.schedule_frame(Box::new(move |_| {
            s.schedule_frame(Box::new(|_| {}));
        }));

        assert_eq!(sched.run_frame(), 1);
        assert_eq!(sched.pending_frames(), 1);
        assert_eq!(sched.run_frame(), 1);
        assert_eq!(sched.pending_frames(), 0);
    }
}
