use log::info;
use rand::Rng;

use crate::art;
use crate::constants::*;
use crate::entities::FallingDebris;
use crate::scheduler::{Control, Sleep, Task};
use crate::world::World;

// The game clock: a year counter that only ever goes up. Written by the
// EraAdvance task alone; the spawner and the pilot read it.
pub struct Era {
    year: u32,
}

impl Era {
    pub fn new() -> Self {
        Era { year: START_YEAR }
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn advance(&mut self) {
        self.year += 1;
    }
}

// Ticks between debris spawns for a given year. None disables spawning
// entirely; later years drop junk faster, down to the two-tick floor.
pub fn garbage_delay(year: u32) -> Option<u32> {
    if year < 1961 {
        None
    } else if year < 1969 {
        Some(20)
    } else if year < 1981 {
        Some(14)
    } else if year < 1995 {
        Some(10)
    } else if year < 2010 {
        Some(8)
    } else if year < 2020 {
        Some(6)
    } else {
        Some(2)
    }
}

const MILESTONES: [(u32, &str); 7] = [
    (1957, "First Sputnik"),
    (1961, "Gagarin flew!"),
    (1969, "Armstrong got on the Moon!"),
    (1971, "First space station Salyut-1"),
    (1981, "Flight of the Shuttle Columbia"),
    (1998, "ISS construction started"),
    (2011, "Messenger launched to Mercury"),
];

pub fn latest_phrase(year: u32) -> Option<&'static str> {
    MILESTONES
        .iter()
        .rev()
        .find(|&&(milestone, _)| milestone <= year)
        .map(|&(_, phrase)| phrase)
}

// Advances the year on a fixed cadence, forever.
pub struct EraAdvance {
    sleep: Sleep,
}

impl EraAdvance {
    pub fn new() -> Self {
        EraAdvance { sleep: Sleep::ticks(TICKS_PER_YEAR) }
    }
}

impl Task for EraAdvance {
    fn poll(&mut self, world: &mut World) -> Control {
        if !self.sleep.ready() {
            return Control::Yield;
        }
        world.era.advance();
        let year = world.era.year();
        if let Some(&(_, phrase)) = MILESTONES.iter().find(|&&(milestone, _)| milestone == year) {
            info!("Year {}: {}", year, phrase);
        }
        self.sleep = Sleep::ticks(TICKS_PER_YEAR);
        Control::Yield
    }
}

// Keeps the orbit filled: picks a random column and junk variant, spawns a
// debris task, then sleeps out the era's spawn delay. While spawning is
// disabled it re-checks every tick, so it wakes up on its own once the era
// allows junk.
pub struct Spawner {
    sleep: Sleep,
}

impl Spawner {
    pub fn new() -> Self {
        Spawner { sleep: Sleep::ticks(0) }
    }
}

impl Task for Spawner {
    fn poll(&mut self, world: &mut World) -> Control {
        if !self.sleep.ready() {
            return Control::Yield;
        }
        let Some(delay) = garbage_delay(world.era.year()) else {
            return Control::Yield;
        };
        let mut rng = rand::thread_rng();
        let (_, canvas_cols) = world.canvas.extent();
        let column = rng.gen_range(1..canvas_cols.max(2)) as f64;
        let frame = art::GARBAGE_FRAMES[rng.gen_range(0..art::GARBAGE_FRAMES.len())];
        let debris = FallingDebris::new(world, column, frame, DEBRIS_SPEED);
        info!("Debris spawned at column {:.0}, next in {} ticks", column, delay);
        world.spawn(Box::new(debris));
        self.sleep = Sleep::ticks(delay);
        Control::Yield
    }
}

// Repaints the current year near the top border every tick.
pub struct YearDisplay;

impl YearDisplay {
    pub fn new() -> Self {
        YearDisplay
    }
}

impl Task for YearDisplay {
    fn poll(&mut self, world: &mut World) -> Control {
        let text = format!("Year {}", world.era.year());
        world.canvas.draw_text(1, 2, &text);
        Control::Yield
    }
}

// Shows the latest milestone phrase centered on the bottom row, erasing
// the previous one when the era moves past it.
pub struct PhraseBanner {
    shown: Option<(&'static str, i32)>,
}

impl PhraseBanner {
    pub fn new() -> Self {
        PhraseBanner { shown: None }
    }
}

impl Task for PhraseBanner {
    fn poll(&mut self, world: &mut World) -> Control {
        let phrase = latest_phrase(world.era.year());
        if phrase == self.shown.map(|(text, _)| text) {
            return Control::Yield;
        }
        if let Some((old, old_col)) = self.shown.take() {
            let blank = " ".repeat(old.chars().count());
            let (canvas_rows, _) = world.canvas.extent();
            world.canvas.draw_text(canvas_rows as i32 - 2, old_col, &blank);
        }
        if let Some(text) = phrase {
            let (canvas_rows, canvas_cols) = world.canvas.extent();
            let col = (canvas_cols as i32 - text.chars().count() as i32) / 2;
            world.canvas.draw_text(canvas_rows as i32 - 2, col, text);
            self.shown = Some((text, col));
        }
        Control::Yield
    }
}
