// One tick's worth of player input: axis deltas in {-1, 0, 1} plus the
// fire and quit requests collected since the previous tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub row_delta: i8,
    pub col_delta: i8,
    pub fire: bool,
    pub quit: bool,
}

impl Controls {
    pub fn new(row_delta: i8, col_delta: i8, fire: bool) -> Self {
        Controls { row_delta, col_delta, fire, quit: false }
    }
}
