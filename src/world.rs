use crate::art;
use crate::difficulty::Era;
use crate::obstacles::ObstacleRegistry;
use crate::rendering::{Canvas, Frame};
use crate::scheduler::Task;
use crate::types::Controls;

// The shared state every task sees on resume. Tasks run one at a time on
// a single logical thread; no task keeps references into the world across
// a yield, identities and copied values cross ticks instead.
pub struct World {
    pub canvas: Canvas,
    pub controls: Controls,
    pub obstacles: ObstacleRegistry,
    pub era: Era,
    // Flipped by the frame-animator task, read by the pilot.
    pub ship_frame: Frame,
    pending: Vec<Box<dyn Task>>,
}

impl World {
    pub fn new(canvas: Canvas) -> Self {
        World {
            canvas,
            controls: Controls::default(),
            obstacles: ObstacleRegistry::new(),
            era: Era::new(),
            ship_frame: art::ROCKET_FRAME_1,
            pending: Vec::new(),
        }
    }

    // Queues a task spawned mid-tick; the scheduler admits it after the
    // current pass, so its first resume lands on the next tick.
    pub fn spawn(&mut self, task: Box<dyn Task>) {
        self.pending.push(task);
    }

    pub(crate) fn drain_spawned(&mut self) -> Vec<Box<dyn Task>> {
        std::mem::take(&mut self.pending)
    }
}
