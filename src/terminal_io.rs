use std::collections::HashMap;
use std::io;
use std::time::Duration;
use crossterm::event::{self, Event, KeyCode};

use crate::types::Controls;

// Drains every key event queued since the previous tick and folds it into
// one per-tick control snapshot. Never blocks.
pub fn read_controls() -> io::Result<Controls> {
    let mut controls = Controls::default();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key_event) = event::read()? {
            match key_event.code {
                KeyCode::Up => controls.row_delta = -1,
                KeyCode::Down => controls.row_delta = 1,
                KeyCode::Left => controls.col_delta = -1,
                KeyCode::Right => controls.col_delta = 1,
                KeyCode::Char(' ') => controls.fire = true,
                KeyCode::Char('q') => controls.quit = true,
                _ => {}
            }
        }
    }
    Ok(controls)
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    controls: HashMap<u64, Controls>,
}

impl SimulatedInput {
    pub fn new(controls: HashMap<u64, Controls>) -> Self {
        SimulatedInput { controls }
    }

    // Controls scripted for this frame, or the idle snapshot.
    pub fn read(&mut self, frame_count: u64) -> Controls {
        self.controls.remove(&frame_count).unwrap_or_default()
    }
}
