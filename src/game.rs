use std::io::{self, Read};
use std::time::Instant;
use log::info;
use rand::Rng;

use crate::constants::*;
use crate::difficulty::{EraAdvance, PhraseBanner, Spawner, YearDisplay};
use crate::entities::{Blink, FrameAnimator, Pilot};
use crate::obstacles::ShowObstacles;
use crate::rendering::{Canvas, OutputTarget};
use crate::scheduler::Scheduler;
use crate::terminal_io::{SimulatedInput, read_controls};
use crate::world::World;

const TITLE_ART: [&str; 5] = [
    r" ____   ____ ____      _    ____  _____ _    _     _",
    r"/ ___| / ___|  _ \    / \  |  _ \|  ___/ \  | |   | |",
    r"\___ \| |   | |_) |  / _ \ | |_) | |_ / _ \ | |   | |",
    r" ___) | |___|  _ <  / ___ \|  __/|  _/ ___ \| |___| |___",
    r"|____/ \____|_| \_\/_/   \_\_|   |_|/_/   \_\_____|_____|",
];

const CONTROL_HINTS: [&str; 3] = [
    "Arrows : steer",
    "Space  : fire the cannon (available from 2020)",
    "q      : quit",
];

// The render driver: seeds the scheduler, then runs the fixed-interval
// tick loop of read input, one scheduler pass, one refresh, sleep out the
// rest of the tick.
pub struct Game {
    world: World,
    scheduler: Scheduler,
    simulated_input: Option<SimulatedInput>,
    debug_mode_active: bool,
    max_frames: Option<u64>,
}

impl Game {
    pub fn new(
        rows: u16,
        cols: u16,
        out: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        debug_mode_active: bool,
        max_frames: Option<u64>,
    ) -> Self {
        Game {
            world: World::new(Canvas::new(rows, cols, out)),
            scheduler: Scheduler::new(),
            simulated_input,
            debug_mode_active,
            max_frames,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        if !self.debug_mode_active {
            self.show_title_screen()?;
        }
        self.seed_tasks();

        let mut frame_count: u64 = 0;
        while self.max_frames.is_none_or(|max| frame_count < max) {
            let tick_started = Instant::now();

            let controls = match &mut self.simulated_input {
                Some(sim_input) => sim_input.read(frame_count),
                None => read_controls()?,
            };
            if controls.quit {
                info!("Quit key pressed. Leaving the tick loop.");
                break;
            }
            self.world.controls = controls;

            self.scheduler.run_one_tick(&mut self.world);
            self.world.canvas.refresh()?;
            if self.debug_mode_active {
                self.world.canvas.dump_to_log();
            }

            frame_count += 1;
            if !self.debug_mode_active {
                let elapsed = tick_started.elapsed();
                if elapsed < TICK_INTERVAL {
                    std::thread::sleep(TICK_INTERVAL - elapsed);
                }
            }
        }
        info!("Tick loop ended after {} frames.", frame_count);
        Ok(())
    }

    fn seed_tasks(&mut self) {
        let (rows, cols) = self.world.canvas.extent();
        let mut rng = rand::thread_rng();
        let glyphs: Vec<char> = STAR_GLYPHS.chars().collect();
        for _ in 0..STARS_AMOUNT {
            let row = rng.gen_range(2..rows.saturating_sub(2).max(3));
            let col = rng.gen_range(2..cols.saturating_sub(2).max(3));
            let glyph = glyphs[rng.gen_range(0..glyphs.len())];
            let delay = rng.gen_range(1..=BLINK_MAX_START_DELAY);
            self.scheduler.register(Box::new(Blink::new(row, col, glyph, delay)));
        }

        self.scheduler.register(Box::new(Pilot::new(rows as f64 / 2.0, cols as f64 / 2.0 - 2.0)));
        self.scheduler.register(Box::new(FrameAnimator::new()));
        self.scheduler.register(Box::new(Spawner::new()));
        self.scheduler.register(Box::new(EraAdvance::new()));
        self.scheduler.register(Box::new(YearDisplay::new()));
        self.scheduler.register(Box::new(PhraseBanner::new()));
        if self.debug_mode_active {
            self.scheduler.register(Box::new(ShowObstacles::new()));
        }
        info!("Seeded {} tasks.", self.scheduler.len());
    }

    fn show_title_screen(&mut self) -> io::Result<()> {
        let (rows, cols) = self.world.canvas.extent();
        let title_start_row = (rows as i32 / 2 - TITLE_ART.len() as i32).max(1);
        for (i, line) in TITLE_ART.iter().enumerate() {
            let col = (cols as i32 - line.chars().count() as i32) / 2;
            self.world.canvas.draw_text(title_start_row + i as i32, col, line);
        }
        for (i, line) in CONTROL_HINTS.iter().enumerate() {
            let row = title_start_row + TITLE_ART.len() as i32 + 2 + i as i32;
            self.world.canvas.draw_text(row, (cols as i32 / 2) - 20, line);
        }
        let press_any_key_msg = "Press any key to start...";
        self.world.canvas.draw_text(
            rows as i32 - 3,
            (cols as i32 - press_any_key_msg.chars().count() as i32) / 2,
            press_any_key_msg,
        );
        self.world.canvas.refresh()?;

        let _ = io::stdin().read(&mut [0u8])?;
        self.world.canvas.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::ScreenBuffer;
    use crate::types::Controls;
    use std::collections::HashMap;

    #[test]
    fn headless_game_runs_a_full_session() {
        let mut script = HashMap::new();
        script.insert(3, Controls::new(-1, 0, false));
        script.insert(4, Controls::new(-1, 0, false));
        script.insert(10, Controls::new(0, 1, true));
        let out = OutputTarget::ScreenBuffer(ScreenBuffer::new(60, 24));
        let mut game =
            Game::new(24, 60, out, Some(SimulatedInput::new(script)), true, Some(300));

        assert!(game.run().is_ok());
    }

    #[test]
    fn quit_control_stops_the_loop_early() {
        let mut script = HashMap::new();
        script.insert(5, Controls { quit: true, ..Controls::default() });
        let out = OutputTarget::ScreenBuffer(ScreenBuffer::new(40, 16));
        let mut game =
            Game::new(16, 40, out, Some(SimulatedInput::new(script)), true, Some(1_000_000));

        assert!(game.run().is_ok());
    }
}
