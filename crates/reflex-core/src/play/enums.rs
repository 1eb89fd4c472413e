use serde::{Deserialize, Serialize};
use strum::{EnumIter, FromRepr, IntoStaticStr};

/// One of the four target colors.
///
/// The discriminant is the value a challenge sample reduces to (`sample % 4`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Blue = 1,
    Yellow = 2,
    Green = 3,
}

impl Color {
    /// Map a raw sample onto a color.
    pub fn from_sample(sample: u8) -> Self {
        match sample % 4 {
            0 => Self::Red,
            1 => Self::Blue,
            2 => Self::Yellow,
            _ => Self::Green,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Physical momentary buttons on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
pub enum Button {
    /// White button, doubles as "exit" on the scores screen.
    Start,
    Red,
    Blue,
    Yellow,
    Green,
}

impl Button {
    /// Button used to open the scoreboard from the menu.
    pub const SCORES: Button = Button::Red;

    /// Button used to leave the scoreboard.
    pub const EXIT: Button = Button::Start;

    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Start => None,
            Self::Red => Some(Color::Red),
            Self::Blue => Some(Color::Blue),
            Self::Yellow => Some(Color::Yellow),
            Self::Green => Some(Color::Green),
        }
    }

    pub fn is_color(&self) -> bool {
        self.color().is_some()
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl From<Color> for Button {
    fn from(color: Color) -> Self {
        match color {
            Color::Red => Self::Red,
            Color::Blue => Self::Blue,
            Color::Yellow => Self::Yellow,
            Color::Green => Self::Green,
        }
    }
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
