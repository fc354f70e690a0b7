//! Easter-egg trigger: a quick burst of clicks opens the game

use std::cell::Cell;
use std::rc::Rc;

use crate::platform::{Scheduler, TimerId};

/// Counts clicks; the count resets after `window_ms` without a click
pub struct ClickBurst {
    scheduler: Rc<dyn Scheduler>,
    needed: u32,
    window_ms: u32,
    count: Rc<Cell<u32>>,
    reset: Cell<Option<TimerId>>,
}

impl ClickBurst {
    pub fn new(scheduler: Rc<dyn Scheduler>, needed: u32, window_ms: u32) -> Self {
        Self {
            scheduler,
            needed: needed.max(1),
            window_ms,
            count: Rc::new(Cell::new(0)),
            reset: Cell::new(None),
        }
    }

    /// Record a click. True when this click completes the burst.
    pub fn register(&self) -> bool {
        if let Some(id) = self.reset.take() {
            self.scheduler.cancel(id);
        }
        let count = self.count.get() + 1;
        if count >= self.needed {
            self.count.set(0);
            log::info!("Easter egg triggered");
            return true;
        }
        self.count.set(count);

        let counter = self.count.clone();
        let id = self
            .scheduler
            .schedule(self.window_ms, Box::new(move || counter.set(0)));
        self.reset.set(id);
        false
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }
}

impl Drop for ClickBurst {
    fn drop(&mut self) {
        if let Some(id) = self.reset.take() {
            self.scheduler.cancel(id);
        }
    }
}
