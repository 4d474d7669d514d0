use log::info;

use crate::art;
use crate::constants::*;
use crate::obstacles::ObstacleId;
use crate::rendering::{CellAttr, Frame};
use crate::scheduler::{Control, Sleep, Task};
use crate::world::World;

// Inertial velocity update. With damping < 1 the speed converges to
// damping / (1 - damping) under constant input instead of growing without
// bound.
pub fn update_speed(speed: f64, direction: i8) -> f64 {
    (speed + direction as f64) * SHIP_DAMPING
}

// --- Star blinker ---

const BLINK_PHASES: [(CellAttr, u32); 4] = [
    (CellAttr::Dim, BLINK_DIM_TICKS),
    (CellAttr::Normal, BLINK_NORMAL_TICKS),
    (CellAttr::Bold, BLINK_BOLD_TICKS),
    (CellAttr::Normal, BLINK_NORMAL_TICKS),
];

// One background star cycling through dim/normal/bold forever, offset by a
// random start delay.
pub struct Blink {
    row: u16,
    col: u16,
    glyph: char,
    phase: usize,
    sleep: Sleep,
}

impl Blink {
    pub fn new(row: u16, col: u16, glyph: char, start_delay: u32) -> Self {
        Blink { row, col, glyph, phase: 0, sleep: Sleep::ticks(start_delay) }
    }
}

impl Task for Blink {
    fn poll(&mut self, world: &mut World) -> Control {
        if !self.sleep.ready() {
            return Control::Yield;
        }
        let (attr, hold) = BLINK_PHASES[self.phase];
        world.canvas.put(self.row as i32, self.col as i32, self.glyph, attr);
        self.phase = (self.phase + 1) % BLINK_PHASES.len();
        self.sleep = Sleep::ticks(hold);
        Control::Yield
    }
}

// --- Spaceship ---

// Flips the shared rocket frame every tick, giving the exhaust flicker
// independent of how the ship moves.
pub struct FrameAnimator {
    flip: bool,
}

impl FrameAnimator {
    pub fn new() -> Self {
        FrameAnimator { flip: false }
    }
}

impl Task for FrameAnimator {
    fn poll(&mut self, world: &mut World) -> Control {
        world.ship_frame = if self.flip { art::ROCKET_FRAME_2 } else { art::ROCKET_FRAME_1 };
        self.flip = !self.flip;
        Control::Yield
    }
}

// The player's ship: inertial movement, clamped to the playfield, firing
// when the era allows it, dying on contact with debris.
pub struct Pilot {
    row: f64,
    column: f64,
    row_speed: f64,
    column_speed: f64,
    // Position and frame of the previous draw. Erased with the captured
    // frame value, since the animator may flip the shared frame between
    // resumes.
    drawn: Option<(f64, f64, Frame)>,
}

impl Pilot {
    pub fn new(row: f64, column: f64) -> Self {
        Pilot { row, column, row_speed: 0.0, column_speed: 0.0, drawn: None }
    }
}

impl Task for Pilot {
    fn poll(&mut self, world: &mut World) -> Control {
        let controls = world.controls;
        self.row_speed = update_speed(self.row_speed, controls.row_delta);
        self.column_speed = update_speed(self.column_speed, controls.col_delta);

        let frame = world.ship_frame;
        let (frame_rows, frame_cols) = frame.extent();
        let (canvas_rows, canvas_cols) = world.canvas.extent();
        let max_row = canvas_rows.saturating_sub(frame_rows + 1).max(1) as f64;
        let max_col = canvas_cols.saturating_sub(frame_cols + 1).max(1) as f64;
        self.row = (self.row + self.row_speed).clamp(1.0, max_row);
        self.column = (self.column + self.column_speed).clamp(1.0, max_col);

        if let Some((row, column, old_frame)) = self.drawn.take() {
            world.canvas.erase_frame(row, column, &old_frame);
        }
        world.canvas.draw_frame(self.row, self.column, &frame);
        self.drawn = Some((self.row, self.column, frame));

        if controls.fire && world.era.year() >= GUN_YEAR {
            info!("Cannon fired from row {:.1}, column {:.1}", self.row, self.column);
            world.spawn(Box::new(Cannonshot::new(self.row, self.column + MUZZLE_COLUMN_OFFSET)));
        }

        if world.obstacles.hit_test(self.row, self.column, frame_rows, frame_cols).is_some() {
            info!("Spaceship collided with debris. Game over.");
            world.canvas.erase_frame(self.row, self.column, &frame);
            world.spawn(Box::new(GameOverBanner::new()));
            return Control::Done;
        }
        Control::Yield
    }
}

// --- Cannon shot ---

enum ShotPhase {
    Flash,
    Charge,
    Fly,
}

// A fired round: one tick of muzzle flash, one tick of charge glyph, then
// straight flight until it leaves the playfield or lands a hit. The
// position stays floating; rounding happens only at draw and collision
// time.
pub struct Cannonshot {
    row: f64,
    column: f64,
    row_speed: f64,
    column_speed: f64,
    phase: ShotPhase,
}

impl Cannonshot {
    pub fn new(row: f64, column: f64) -> Self {
        Cannonshot::with_speed(row, column, SHOT_ROW_SPEED, SHOT_COLUMN_SPEED)
    }

    pub fn with_speed(row: f64, column: f64, row_speed: f64, column_speed: f64) -> Self {
        Cannonshot { row, column, row_speed, column_speed, phase: ShotPhase::Flash }
    }

    fn glyph(&self) -> char {
        if self.column_speed != 0.0 { '-' } else { '|' }
    }
}

impl Task for Cannonshot {
    fn poll(&mut self, world: &mut World) -> Control {
        let row = self.row.round();
        let column = self.column.round();
        match self.phase {
            ShotPhase::Flash => {
                world.canvas.put(row as i32, column as i32, '*', CellAttr::Normal);
                self.phase = ShotPhase::Charge;
                Control::Yield
            }
            ShotPhase::Charge => {
                world.canvas.put(row as i32, column as i32, 'O', CellAttr::Normal);
                self.phase = ShotPhase::Fly;
                Control::Yield
            }
            ShotPhase::Fly => {
                world.canvas.put(row as i32, column as i32, ' ', CellAttr::Normal);
                self.row += self.row_speed;
                self.column += self.column_speed;
                let (canvas_rows, canvas_cols) = world.canvas.extent();
                let row = self.row.round();
                let column = self.column.round();
                if row < 1.0
                    || row >= (canvas_rows - 1) as f64
                    || column < 1.0
                    || column >= (canvas_cols - 1) as f64
                {
                    return Control::Done;
                }
                if let Some(id) = world.obstacles.hit_test(row, column, 1, 1) {
                    info!("Shot hit obstacle {:?}", id);
                    world.obstacles.mark_hit(id);
                    world.spawn(Box::new(Explosion::new(self.row, self.column)));
                    return Control::Done;
                }
                world.canvas.put(row as i32, column as i32, self.glyph(), CellAttr::Normal);
                Control::Yield
            }
        }
    }
}

// --- Explosion effect ---

// Plays the explosion frames centered on the impact point, one per tick.
pub struct Explosion {
    row: f64,
    column: f64,
    index: usize,
    drawn: bool,
}

impl Explosion {
    pub fn new(row: f64, column: f64) -> Self {
        Explosion { row, column, index: 0, drawn: false }
    }

    fn corner(&self, frame: &Frame) -> (f64, f64) {
        let (rows, cols) = frame.extent();
        (self.row - rows as f64 / 2.0, self.column - cols as f64 / 2.0)
    }
}

impl Task for Explosion {
    fn poll(&mut self, world: &mut World) -> Control {
        if self.drawn {
            let frame = art::EXPLOSION_FRAMES[self.index];
            let (row, column) = self.corner(&frame);
            world.canvas.erase_frame(row, column, &frame);
            self.index += 1;
        }
        if self.index >= art::EXPLOSION_FRAMES.len() {
            return Control::Done;
        }
        let frame = art::EXPLOSION_FRAMES[self.index];
        let (row, column) = self.corner(&frame);
        world.canvas.draw_frame(row, column, &frame);
        self.drawn = true;
        Control::Yield
    }
}

// --- Falling debris ---

// A piece of junk falling from the top edge. Owns its registry entry: no
// other task removes it, which keeps removal single-shot on every path.
pub struct FallingDebris {
    id: ObstacleId,
    row: f64,
    column: f64,
    speed: f64,
    frame: Frame,
    drawn: bool,
}

impl FallingDebris {
    // Inserts the obstacle box at row 0; the spawn column is clamped so
    // the whole frame starts inside the playfield.
    pub fn new(world: &mut World, column: f64, frame: Frame, speed: f64) -> Self {
        let (frame_rows, frame_cols) = frame.extent();
        let (_, canvas_cols) = world.canvas.extent();
        let max_col = canvas_cols.saturating_sub(frame_cols + 1).max(1) as f64;
        let column = column.clamp(1.0, max_col);
        let id = world.obstacles.insert(0.0, column, frame_rows, frame_cols);
        FallingDebris { id, row: 0.0, column, speed, frame, drawn: false }
    }

    pub fn id(&self) -> ObstacleId {
        self.id
    }
}

impl Task for FallingDebris {
    fn poll(&mut self, world: &mut World) -> Control {
        // A shot only marked the hit; the owner completes the removal
        // here, before drawing anything further.
        if world.obstacles.is_hit(self.id) {
            if self.drawn {
                world.canvas.erase_frame(self.row, self.column, &self.frame);
            }
            world.obstacles.remove(self.id);
            return Control::Done;
        }
        if self.drawn {
            world.canvas.erase_frame(self.row, self.column, &self.frame);
            self.row += self.speed;
            world.obstacles.advance(self.id, self.speed);
            let (canvas_rows, _) = world.canvas.extent();
            let (frame_rows, _) = self.frame.extent();
            if self.row >= canvas_rows.saturating_sub(frame_rows) as f64 {
                world.obstacles.remove(self.id);
                return Control::Done;
            }
        }
        world.canvas.draw_frame(self.row, self.column, &self.frame);
        self.drawn = true;
        Control::Yield
    }
}

// --- Game over banner ---

// Repaints the banner centered, forever. Stopping the tick loop stays the
// driver's call.
pub struct GameOverBanner;

impl GameOverBanner {
    pub fn new() -> Self {
        GameOverBanner
    }
}

impl Task for GameOverBanner {
    fn poll(&mut self, world: &mut World) -> Control {
        let (canvas_rows, canvas_cols) = world.canvas.extent();
        let (frame_rows, frame_cols) = art::GAME_OVER.extent();
        let row = canvas_rows.saturating_sub(frame_rows) as f64 / 2.0;
        let column = canvas_cols.saturating_sub(frame_cols) as f64 / 2.0;
        world.canvas.draw_frame(row, column, &art::GAME_OVER);
        Control::Yield
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::Canvas;
    use crate::scheduler::Scheduler;

    const JUNK: Frame = Frame::new("###\n###\n###");

    fn test_world() -> World {
        World::new(Canvas::headless(20, 40))
    }

    fn unlock_cannon(world: &mut World) {
        while world.era.year() < GUN_YEAR {
            world.era.advance();
        }
    }

    #[test]
    fn speed_converges_under_sustained_input() {
        let mut speed = 0.0;
        let mut previous = 0.0;
        for tick in 0..200 {
            speed = update_speed(speed, 1);
            assert!(speed <= SHIP_DAMPING / (1.0 - SHIP_DAMPING) + 1e-9);
            if tick > 0 {
                assert!(speed >= previous);
            }
            previous = speed;
        }
        assert!((speed - SHIP_DAMPING / (1.0 - SHIP_DAMPING)).abs() < 1e-6);

        // Released input decays back toward rest.
        for _ in 0..100 {
            speed = update_speed(speed, 0);
        }
        assert!(speed.abs() < 1e-6);
    }

    #[test]
    fn pilot_stays_inside_the_playfield() {
        let mut world = test_world();
        let mut pilot = Pilot::new(10.0, 20.0);
        let (canvas_rows, canvas_cols) = world.canvas.extent();

        // Hold every corner direction long enough to slam into the walls.
        for &(dy, dx) in &[(-1i8, -1i8), (-1, 1), (1, 1), (1, -1)] {
            for _ in 0..60 {
                world.controls = crate::types::Controls::new(dy, dx, false);
                assert_eq!(pilot.poll(&mut world), Control::Yield);
                let (frame_rows, frame_cols) = world.ship_frame.extent();
                assert!(pilot.row >= 1.0);
                assert!(pilot.row <= (canvas_rows - frame_rows - 1) as f64);
                assert!(pilot.column >= 1.0);
                assert!(pilot.column <= (canvas_cols - frame_cols - 1) as f64);
            }
        }
    }

    #[test]
    fn fire_is_gated_on_the_cannon_unlock_year() {
        let mut world = test_world();
        let mut pilot = Pilot::new(10.0, 20.0);
        world.controls = crate::types::Controls::new(0, 0, true);

        pilot.poll(&mut world);
        assert!(world.drain_spawned().is_empty());

        unlock_cannon(&mut world);
        pilot.poll(&mut world);
        assert_eq!(world.drain_spawned().len(), 1);
    }

    #[test]
    fn pilot_collision_registers_one_game_over_and_stops_resuming() {
        let mut world = test_world();
        // Debris box covering the middle of the playfield.
        world.obstacles.insert(8.0, 15.0, 8, 12);

        let mut scheduler = Scheduler::new();
        scheduler.register(Box::new(Pilot::new(10.0, 20.0)));

        scheduler.run_one_tick(&mut world);
        // Pilot terminated; only the banner it spawned remains.
        assert_eq!(scheduler.len(), 1);

        for _ in 0..5 {
            scheduler.run_one_tick(&mut world);
        }
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn shot_hit_removes_obstacle_next_tick_and_spawns_explosion() {
        let mut world = test_world();
        let mut scheduler = Scheduler::new();
        // Stationary junk at rows 0..3, columns 10..13.
        let debris = FallingDebris::new(&mut world, 10.0, JUNK, 0.0);
        let id = debris.id();
        scheduler.register(Box::new(debris));
        // Flies upward into the junk on its first flight tick.
        scheduler.register(Box::new(Cannonshot::with_speed(3.0, 11.0, -0.6, 0.0)));

        scheduler.run_one_tick(&mut world); // flash
        scheduler.run_one_tick(&mut world); // charge
        assert!(world.obstacles.contains(id));

        // Tick T: the shot advances to row 2.4 -> cell 2, marks the hit,
        // spawns the explosion and terminates.
        scheduler.run_one_tick(&mut world);
        assert!(world.obstacles.is_hit(id));
        assert_eq!(scheduler.len(), 2); // debris + explosion

        // Tick T+1: the owner observes the mark and removes itself.
        scheduler.run_one_tick(&mut world);
        assert!(!world.obstacles.contains(id));
        assert!(world.obstacles.is_empty());
        assert_eq!(scheduler.len(), 1); // explosion still playing
    }

    #[test]
    fn shot_leaving_the_canvas_terminates_without_side_effects() {
        let mut world = test_world();
        let mut shot = Cannonshot::with_speed(2.0, 11.0, -1.0, 0.0);
        assert_eq!(shot.poll(&mut world), Control::Yield); // flash
        assert_eq!(shot.poll(&mut world), Control::Yield); // charge
        assert_eq!(shot.poll(&mut world), Control::Yield); // row 1, top interior row
        assert_eq!(shot.poll(&mut world), Control::Done); // row 0 -> border
        assert!(world.drain_spawned().is_empty());
    }

    #[test]
    fn debris_exits_the_playfield_within_the_expected_ticks() {
        let mut world = test_world(); // 20 rows
        let mut debris = FallingDebris::new(&mut world, 10.0, JUNK, 0.5);
        let id = debris.id();

        let mut polls = 0;
        loop {
            polls += 1;
            if debris.poll(&mut world) == Control::Done {
                break;
            }
            assert!(polls <= 40, "debris should have exited by now");
        }
        assert!(polls <= 40);
        assert!(!world.obstacles.contains(id));
    }

    #[test]
    fn hit_debris_erases_itself_and_clears_the_marker() {
        let mut world = test_world();
        let mut debris = FallingDebris::new(&mut world, 10.0, JUNK, 0.5);
        let id = debris.id();

        debris.poll(&mut world);
        assert_eq!(world.canvas.glyph_at(0, 10), '#');

        world.obstacles.mark_hit(id);
        assert_eq!(debris.poll(&mut world), Control::Done);
        assert_eq!(world.canvas.glyph_at(0, 10), ' ');
        assert!(!world.obstacles.contains(id));
        assert!(!world.obstacles.is_hit(id));
    }

    #[test]
    fn explosion_plays_all_frames_then_cleans_up() {
        let mut world = test_world();
        let mut explosion = Explosion::new(10.0, 20.0);
        for _ in 0..art::EXPLOSION_FRAMES.len() {
            assert_eq!(explosion.poll(&mut world), Control::Yield);
        }
        assert_eq!(explosion.poll(&mut world), Control::Done);
        for row in 8..13u16 {
            for col in 17..24u16 {
                assert_eq!(world.canvas.glyph_at(row, col), ' ');
            }
        }
    }

    #[test]
    fn star_blinks_through_attributes() {
        let mut world = test_world();
        let mut star = Blink::new(5, 5, '*', 0);
        star.poll(&mut world);
        assert_eq!(world.canvas.glyph_at(5, 5), '*');
        assert_eq!(world.canvas.attr_at(5, 5), CellAttr::Dim);

        // Twenty waiting polls, then the transition to the normal phase.
        for _ in 0..=BLINK_DIM_TICKS {
            star.poll(&mut world);
        }
        assert_eq!(world.canvas.attr_at(5, 5), CellAttr::Normal);
    }
}
