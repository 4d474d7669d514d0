use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Attribute, SetAttribute},
};

// Immutable rectangular glyph art. Drawn and erased as a whole; spaces in
// the art are transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    text: &'static str,
}

impl Frame {
    pub const fn new(text: &'static str) -> Self {
        Frame { text }
    }

    pub fn lines(&self) -> std::str::Lines<'static> {
        self.text.lines()
    }

    // (rows, columns) of the art's bounding box.
    pub fn extent(&self) -> (u16, u16) {
        let rows = self.text.lines().count() as u16;
        let cols = self.text.lines().map(|line| line.chars().count()).max().unwrap_or(0) as u16;
        (rows, cols)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellAttr {
    Normal,
    Dim,
    Bold,
}

impl CellAttr {
    fn attribute(self) -> Attribute {
        match self {
            CellAttr::Normal => Attribute::Reset,
            CellAttr::Dim => Attribute::Dim,
            CellAttr::Bold => Attribute::Bold,
        }
    }
}

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
            self.cursor_x += 1;
        }
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            }
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Attributes are invisible headless
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                let s = String::from_utf8_lossy(buf);
                sb.write_str(&s);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

// --- Canvas: the character-grid playfield ---

// Cells persist across ticks; tasks erase what they drew. refresh paints
// the whole grid to the render target, border on top.
pub struct Canvas {
    grid: Vec<Vec<(char, CellAttr)>>,
    rows: u16,
    cols: u16,
    out: OutputTarget,
}

impl Canvas {
    pub fn new(rows: u16, cols: u16, out: OutputTarget) -> Self {
        Canvas {
            grid: vec![vec![(' ', CellAttr::Normal); cols as usize]; rows as usize],
            rows,
            cols,
            out,
        }
    }

    // In-memory canvas for tests and --debug runs.
    pub fn headless(rows: u16, cols: u16) -> Self {
        Canvas::new(rows, cols, OutputTarget::ScreenBuffer(ScreenBuffer::new(cols, rows)))
    }

    pub fn extent(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    pub fn put(&mut self, row: i32, col: i32, glyph: char, attr: CellAttr) {
        if row >= 0 && (row as u16) < self.rows && col >= 0 && (col as u16) < self.cols {
            self.grid[row as usize][col as usize] = (glyph, attr);
        }
    }

    pub fn draw_text(&mut self, row: i32, col: i32, text: &str) {
        for (offset, glyph) in text.chars().enumerate() {
            self.put(row, col + offset as i32, glyph, CellAttr::Normal);
        }
    }

    // Stamps a frame with its top-left corner at the given float position,
    // rounding only here. Space glyphs leave the cells underneath alone.
    pub fn draw_frame(&mut self, row: f64, column: f64, frame: &Frame) {
        self.stamp(row, column, frame, false);
    }

    // Clears exactly the cells a draw_frame with the same arguments touched.
    pub fn erase_frame(&mut self, row: f64, column: f64, frame: &Frame) {
        self.stamp(row, column, frame, true);
    }

    fn stamp(&mut self, row: f64, column: f64, frame: &Frame, negative: bool) {
        let start_row = row.round() as i32;
        let start_col = column.round() as i32;
        for (dr, line) in frame.lines().enumerate() {
            for (dc, glyph) in line.chars().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                let stamped = if negative { ' ' } else { glyph };
                self.put(start_row + dr as i32, start_col + dc as i32, stamped, CellAttr::Normal);
            }
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.grid {
            for cell in row.iter_mut() {
                *cell = (' ', CellAttr::Normal);
            }
        }
    }

    pub fn glyph_at(&self, row: u16, col: u16) -> char {
        self.grid[row as usize][col as usize].0
    }

    pub fn attr_at(&self, row: u16, col: u16) -> CellAttr {
        self.grid[row as usize][col as usize].1
    }

    // Paints the grid and border to the render target. Called by the
    // driver once per tick, after the scheduler pass.
    pub fn refresh(&mut self) -> io::Result<()> {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        if rows < 2 || cols < 2 {
            return Ok(());
        }

        let horizontal: String =
            std::iter::once('+').chain(std::iter::repeat('-').take(cols - 2)).chain(std::iter::once('+')).collect();

        for y in 0..rows {
            self.out.execute_move_to(MoveTo(0, y as u16))?;
            if y == 0 || y == rows - 1 {
                write!(self.out, "{}", horizontal)?;
                continue;
            }
            write!(self.out, "|")?;
            let mut run = String::new();
            let mut run_attr = self.grid[y][1].1;
            for x in 1..cols - 1 {
                let (glyph, attr) = self.grid[y][x];
                if attr != run_attr {
                    self.write_run(&run, run_attr)?;
                    run.clear();
                    run_attr = attr;
                }
                run.push(glyph);
            }
            self.write_run(&run, run_attr)?;
            write!(self.out, "|")?;
        }
        self.out.flush()
    }

    fn write_run(&mut self, run: &str, attr: CellAttr) -> io::Result<()> {
        if run.is_empty() {
            return Ok(());
        }
        if attr == CellAttr::Normal {
            write!(self.out, "{}", run)
        } else {
            self.out.execute_other_command(SetAttribute(attr.attribute()))?;
            write!(self.out, "{}", run)?;
            self.out.execute_other_command(SetAttribute(Attribute::Reset))
        }
    }

    // Dumps the headless buffer to the log; no-op on a real terminal.
    pub fn dump_to_log(&self) {
        if let OutputTarget::ScreenBuffer(sb) = &self.out {
            sb.print_to_log();
        }
    }

    #[cfg(test)]
    fn rendered_row(&self, row: u16) -> String {
        match &self.out {
            OutputTarget::ScreenBuffer(sb) => sb.buffer[row as usize].iter().collect(),
            OutputTarget::Stdout(_) => String::new(),
        }
    }
}
