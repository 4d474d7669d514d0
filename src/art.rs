use crate::rendering::Frame;

// Two rocket frames flipped by the animator task; the exhaust flickers
// while the hull stays put.
pub const ROCKET_FRAME_1: Frame = Frame::new(
    r"  ^
 /|\
 |o|
/|||\
 ' '",
);

pub const ROCKET_FRAME_2: Frame = Frame::new(
    r"  ^
 /|\
 |o|
/|||\
 ! !",
);

const DUCK: Frame = Frame::new(
    r"  __
<(o )___
 ( ._> /
  `---'",
);

const LAMP: Frame = Frame::new(
    r" _
(_)
|=|
|=|
'-'",
);

const TELESCOPE: Frame = Frame::new(
    r" ___
/   \
|===|
|   |
\___/
 | |",
);

const TRASH_SMALL: Frame = Frame::new(
    r".--.
|##|
'--'",
);

const TRASH_LARGE: Frame = Frame::new(
    r".----.
|#  #|
|  # |
|#  #|
'----'",
);

const TRASH_XL: Frame = Frame::new(
    r".------.
|#    #|
|  ##  |
|  ##  |
|#    #|
'------'",
);

pub const GARBAGE_FRAMES: [Frame; 6] = [DUCK, LAMP, TELESCOPE, TRASH_SMALL, TRASH_LARGE, TRASH_XL];

pub const EXPLOSION_FRAMES: [Frame; 4] = [
    Frame::new(
        r" \ /
  .
 / \",
    ),
    Frame::new(
        r" \|/
 -o-
 /|\",
    ),
    Frame::new(
        r" \|/
 -*-
 /|\",
    ),
    Frame::new(
        r" . .
  '
 . .",
    ),
];

pub const GAME_OVER: Frame = Frame::new(
    r"  ____    _    __  __ _____    _____     _______ ____
 / ___|  / \  |  \/  | ____|  / _ \ \   / / ____|  _ \
| |  _  / _ \ | |\/| |  _|   | | | \ \ / /|  _| | |_) |
| |_| |/ ___ \| |  | | |___  | |_| |\ V / | |___|  _ <
 \____/_/   \_\_|  |_|_____|  \___/  \_/  |_____|_| \_\",
);
