use crate::world::World;

// What a task asks for after one resume slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Yield,
    Done,
}

// A resumable unit of animation or game logic, advanced once per tick until
// it returns Done. Anything shared between tasks lives in the World handed
// to every poll. Tasks never fail: one that cannot continue returns Done
// instead of panicking into the scheduler.
pub trait Task {
    fn poll(&mut self, world: &mut World) -> Control;
}

// Tick-counted suspension. A task embedding a Sleep early-returns while it
// is pending, suspending for an exact number of ticks without busy-waiting.
pub struct Sleep {
    remaining: u32,
}

impl Sleep {
    pub fn ticks(remaining: u32) -> Self {
        Sleep { remaining }
    }

    pub fn ready(&mut self) -> bool {
        if self.remaining == 0 {
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}

// --- Round-robin cooperative executor ---
pub struct Scheduler {
    tasks: Vec<Box<dyn Task>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { tasks: Vec::new() }
    }

    pub fn register(&mut self, task: Box<dyn Task>) {
        self.tasks.push(task);
    }

    // One pass: every task active at the start of the pass is resumed
    // exactly once, in list order. Tasks spawned during the pass (via
    // World::spawn) are admitted only after it, so their first resume
    // lands on the next tick.
    pub fn run_one_tick(&mut self, world: &mut World) {
        let mut pass = std::mem::take(&mut self.tasks);
        for mut task in pass.drain(..) {
            match task.poll(world) {
                Control::Yield => self.tasks.push(task),
                Control::Done => {}
            }
        }
        self.tasks.append(&mut world.drain_spawned());
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
