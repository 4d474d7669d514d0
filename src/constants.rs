use std::time::Duration;

// --- Game Constants ---
pub const TICK_INTERVAL: Duration = Duration::from_millis(100); // One scheduler pass per tick
pub const STARS_AMOUNT: usize = 100;
pub const STAR_GLYPHS: &str = "+*.:";

pub const SHIP_DAMPING: f64 = 0.8; // Must stay < 1 so speed converges under held input
pub const SHOT_ROW_SPEED: f64 = -0.3; // Upwards
pub const SHOT_COLUMN_SPEED: f64 = 0.0;
pub const MUZZLE_COLUMN_OFFSET: f64 = 2.0; // Shot leaves from the rocket nose column

pub const DEBRIS_SPEED: f64 = 0.5; // Rows per tick

pub const START_YEAR: u32 = 1957;
pub const TICKS_PER_YEAR: u32 = 15;
pub const GUN_YEAR: u32 = 2020; // Cannon unlocks from this year on

pub const BLINK_DIM_TICKS: u32 = 20;
pub const BLINK_NORMAL_TICKS: u32 = 3;
pub const BLINK_BOLD_TICKS: u32 = 5;
pub const BLINK_MAX_START_DELAY: u32 = 10;
