//! Frame pacing for the particle field
//!
//! Two states: running (exactly one frame callback armed) and stopped (none).
//! Hidden pages stop the loop; resizes regenerate the field.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;

use super::field::ParticleField;
use crate::platform::{Scheduler, TimerId, Viewport};
use crate::renderer::Painter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

struct AnimatorInner<P> {
    field: ParticleField,
    painter: P,
    state: RunState,
    /// Armed frame callback while running
    frame: Option<TimerId>,
    /// Pending debounced resize
    resize_timer: Option<TimerId>,
}

type Shared<P> = Rc<RefCell<AnimatorInner<P>>>;

/// Drives a `ParticleField` from the scheduler's frame callbacks
pub struct FieldAnimator<P: Painter + 'static> {
    inner: Shared<P>,
    scheduler: Rc<dyn Scheduler>,
    viewport: Rc<dyn Fn() -> Viewport>,
}

impl<P: Painter + 'static> FieldAnimator<P> {
    /// Size the painter for the field and start running
    pub fn new(
        field: ParticleField,
        mut painter: P,
        scheduler: Rc<dyn Scheduler>,
        viewport: Rc<dyn Fn() -> Viewport>,
    ) -> Self {
        field.configure(&mut painter);
        let animator = Self {
            inner: Rc::new(RefCell::new(AnimatorInner {
                field,
                painter,
                state: RunState::Stopped,
                frame: None,
                resize_timer: None,
            })),
            scheduler,
            viewport,
        };
        animator.start();
        animator
    }

    pub fn state(&self) -> RunState {
        self.inner.borrow().state
    }

    pub fn start(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state == RunState::Running {
                return;
            }
            inner.state = RunState::Running;
        }
        log::debug!("Particle animation started");
        arm(&self.inner, &self.scheduler);
    }

    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == RunState::Stopped {
            return;
        }
        inner.state = RunState::Stopped;
        if let Some(id) = inner.frame.take() {
            self.scheduler.cancel_frame(id);
        }
        log::debug!("Particle animation stopped");
    }

    /// Page visibility changed
    pub fn set_page_visible(&self, visible: bool) {
        if visible {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn set_pointer(&self, pos: Option<Vec2>) {
        self.inner.borrow_mut().field.set_pointer(pos);
    }

    /// Re-measure the viewport now and regenerate the field
    pub fn resize(&self) {
        resize_now(&self.inner, (self.viewport)());
    }

    /// Re-measure after `delay_ms`; a newer request replaces a pending one
    pub fn resize_debounced(&self, delay_ms: u32) {
        let previous = self.inner.borrow_mut().resize_timer.take();
        if let Some(id) = previous {
            self.scheduler.cancel(id);
        }

        let weak: Weak<RefCell<AnimatorInner<P>>> = Rc::downgrade(&self.inner);
        let viewport = self.viewport.clone();
        let id = self.scheduler.schedule(
            delay_ms,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                inner.borrow_mut().resize_timer = None;
                resize_now(&inner, viewport());
            }),
        );
        self.inner.borrow_mut().resize_timer = id;
    }

    /// Read-only access to the field
    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField) -> R) -> R {
        f(&self.inner.borrow().field)
    }

    pub fn with_painter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.inner.borrow().painter)
    }
}

impl<P: Painter + 'static> Drop for FieldAnimator<P> {
    fn drop(&mut self) {
        self.stop();
        if let Some(id) = self.inner.borrow_mut().resize_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

fn resize_now<P: Painter>(inner: &Shared<P>, viewport: Viewport) {
    let mut guard = inner.borrow_mut();
    let AnimatorInner { field, painter, .. } = &mut *guard;
    field.resize(viewport);
    field.configure(painter);
    log::debug!(
        "Particle field resized to {}x{} @{}x",
        viewport.width,
        viewport.height,
        viewport.dpr
    );
}

/// Arm the next frame callback
fn arm<P: Painter + 'static>(inner: &Shared<P>, scheduler: &Rc<dyn Scheduler>) {
    let weak = Rc::downgrade(inner);
    let sched = scheduler.clone();
    let id = scheduler.schedule_frame(Box::new(move |_time| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        {
            let mut guard = inner.borrow_mut();
            guard.frame = None;
            if guard.state != RunState::Running {
                return;
            }
            let AnimatorInner { field, painter, .. } = &mut *guard;
            field.frame(painter);
        }
        arm(&inner, &sched);
    }));
    inner.borrow_mut().frame = id;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;
    use crate::renderer::RecordingPainter;
    use crate::settings::{DeviceTier, Settings};
    use std::cell::Cell;

    struct Rig {
        sched: Rc<ManualScheduler>,
        viewport: Rc<Cell<Viewport>>,
        animator: FieldAnimator<RecordingPainter>,
    }

    fn rig() -> Rig {
        let sched = Rc::new(ManualScheduler::new());
        let viewport = Rc::new(Cell::new(Viewport::new(800.0, 600.0, 1.0)));
        let field = ParticleField::new(
            &Settings::default(),
            DeviceTier::Desktop,
            viewport.get(),
            1,
        );
        let vp = viewport.clone();
        let animator = FieldAnimator::new(
            field,
            RecordingPainter::new(),
            sched.clone(),
            Rc::new(move || vp.get()),
        );
        Rig {
            sched,
            viewport,
            animator,
        }
    }

    #[test]
    fn test_starts_running_with_one_frame() {
        let rig = rig();
        assert_eq!(rig.animator.state(), RunState::Running);
        assert_eq!(rig.sched.pending_frames(), 1);

        for _ in 0..5 {
            assert_eq!(rig.sched.run_frame(), 1);
        }
        assert_eq!(rig.sched.pending_frames(), 1);
        assert_eq!(rig.animator.with_field(|f| f.steps()), 5);
        assert_eq!(rig.animator.with_painter(|p| p.frames), 5);
    }

    #[test]
    fn test_start_twice_no_duplicate_chain() {
        let rig = rig();
        rig.animator.start();
        rig.animator.start();
        assert_eq!(rig.sched.pending_frames(), 1);
    }

    #[test]
    fn test_hidden_stops_visible_resumes() {
        let rig = rig();
        rig.animator.set_page_visible(false);
        assert_eq!(rig.animator.state(), RunState::Stopped);
        assert_eq!(rig.sched.pending_frames(), 0);
        assert_eq!(rig.sched.run_frame(), 0);

        rig.animator.set_page_visible(true);
        rig.animator.set_page_visible(true);
        assert_eq!(rig.animator.state(), RunState::Running);
        assert_eq!(rig.sched.pending_frames(), 1);
    }

    #[test]
    fn test_resize_regenerates_and_configures() {
        let rig = rig();
        rig.sched.run_frame();
        rig.viewport.set(Viewport::new(400.0, 300.0, 2.0));
        rig.animator.resize();

        assert_eq!(rig.animator.with_field(|f| f.bounds()), Vec2::new(400.0, 300.0));
        assert_eq!(rig.animator.with_field(|f| f.steps()), 0);
        assert_eq!(rig.animator.with_painter(|p| p.buffer), (800, 600));
    }

    #[test]
    fn test_orientation_resize_is_debounced() {
        let rig = rig();
        rig.animator.resize_debounced(100);
        rig.sched.advance(50);
        rig.viewport.set(Viewport::new(600.0, 800.0, 1.0));
        rig.animator.resize_debounced(100);
        assert_eq!(rig.sched.pending_timers(), 1);

        rig.sched.advance(99);
        assert_eq!(rig.animator.with_field(|f| f.bounds()), Vec2::new(800.0, 600.0));
        rig.sched.advance(1);
        assert_eq!(rig.animator.with_field(|f| f.bounds()), Vec2::new(600.0, 800.0));
        assert_eq!(rig.sched.pending_timers(), 0);
    }

    #[test]
    fn test_drop_cancels_frame() {
        let rig = rig();
        let sched = rig.sched.clone();
        drop(rig);
        assert_eq!(sched.pending_frames(), 0);
    }
}
