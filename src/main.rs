use std::collections::HashMap;
use std::env;
use std::io;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode, size},
};
use log::{error, info};

mod art;
mod constants;
mod difficulty;
mod entities;
mod game;
mod obstacles;
mod rendering;
mod scheduler;
mod terminal_io;
mod types;
mod world;

use game::Game;
use rendering::{OutputTarget, ScreenBuffer};
use terminal_io::SimulatedInput;
use types::Controls;

fn main() -> io::Result<()> {
    simple_logging::log_to_file("scrapfall.log", log::LevelFilter::Info).unwrap();
    info!("Starting scrapfall.");

    let args: Vec<String> = env::args().collect();
    let debug_mode_active = args.len() > 1 && args[1] == "--debug";

    if debug_mode_active {
        info!("Debug mode enabled.");
        let mut debug_width: u16 = 80;
        let mut debug_height: u16 = 24;
        if args.len() >= 4 {
            debug_width = args[2].parse().unwrap_or(80);
            debug_height = args[3].parse().unwrap_or(24);
        }
        let max_frames = if args.len() > 4 { args[4].parse().ok() } else { Some(200) };
        info!("Debug resolution set to {}x{}", debug_width, debug_height);

        let out = OutputTarget::ScreenBuffer(ScreenBuffer::new(debug_width, debug_height));
        let mut sim_controls = HashMap::new();
        sim_controls.insert(1, Controls::new(-1, 0, false));
        sim_controls.insert(2, Controls::new(-1, 0, false));
        sim_controls.insert(3, Controls::new(0, 1, true));
        sim_controls.insert(4, Controls::new(1, -1, false));
        let simulated_input = Some(SimulatedInput::new(sim_controls));

        let mut game =
            Game::new(debug_height, debug_width, out, simulated_input, true, max_frames);
        return game.run();
    }

    let max_frames: Option<u64> = if args.len() > 1 { args[1].parse().ok() } else { None };

    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let (width, height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", width, height);

    let mut out = OutputTarget::Stdout(io::stdout());
    out.execute_other_command(Clear(ClearType::All))
        .map_err(|e| { error!("Failed to clear screen: {}", e); e })?;
    out.execute_other_command(Hide)
        .map_err(|e| { error!("Failed to hide cursor: {}", e); e })?;

    let mut game = Game::new(height, width, out, None, false, max_frames);
    let result = game.run();
    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }

    execute!(io::stdout(), Show).map_err(|e| { error!("Failed to show cursor on exit: {}", e); e })?;
    disable_raw_mode().map_err(|e| { error!("Failed to disable raw mode on exit: {}", e); e })?;
    info!("Exiting scrapfall.");
    result
}
