use bitflags::bitflags;
use strum::IntoEnumIterator;

use crate::play::{Button, Color};

bitflags! {
    /// Set of target colors for one round.
    ///
    /// Bit positions follow the button wiring (Green on bit 0 through Red on
    /// bit 3), so a mask converts to a [`ButtonSet`] without remapping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChallengeMask: u8 {
        const GREEN = 1 << 0;
        const YELLOW = 1 << 1;
        const BLUE = 1 << 2;
        const RED = 1 << 3;
    }
}

impl ChallengeMask {
    pub fn from_color(color: Color) -> Self {
        match color {
            Color::Red => Self::RED,
            Color::Blue => Self::BLUE,
            Color::Yellow => Self::YELLOW,
            Color::Green => Self::GREEN,
        }
    }

    pub fn contains_color(&self, color: Color) -> bool {
        self.contains(Self::from_color(color))
    }

    /// Colors in the mask, in sample order (Red, Blue, Yellow, Green).
    pub fn colors(&self) -> impl Iterator<Item = Color> + use<> {
        let mask = *self;
        Color::iter().filter(move |c| mask.contains_color(*c))
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl From<Color> for ChallengeMask {
    fn from(color: Color) -> Self {
        Self::from_color(color)
    }
}

impl FromIterator<Color> for ChallengeMask {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |mask, color| mask | Self::from_color(color))
    }
}

impl std::fmt::Display for ChallengeMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.colors().map(|c| c.name()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

bitflags! {
    /// Set of physical buttons: armed event sources or an input snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonSet: u8 {
        const GREEN = 1 << 0;
        const YELLOW = 1 << 1;
        const BLUE = 1 << 2;
        const RED = 1 << 3;
        const START = 1 << 4;
    }
}

impl ButtonSet {
    pub fn from_button(button: Button) -> Self {
        match button {
            Button::Start => Self::START,
            Button::Red => Self::RED,
            Button::Blue => Self::BLUE,
            Button::Yellow => Self::YELLOW,
            Button::Green => Self::GREEN,
        }
    }

    pub fn contains_button(&self, button: Button) -> bool {
        self.contains(Self::from_button(button))
    }

    /// The color buttons of this set as a mask.
    pub fn colors(&self) -> ChallengeMask {
        ChallengeMask::from_bits_truncate(self.bits())
    }

    pub fn buttons(&self) -> impl Iterator<Item = Button> + use<> {
        let set = *self;
        Button::iter().filter(move |b| set.contains_button(*b))
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        Self::from_button(button)
    }
}

impl From<ChallengeMask> for ButtonSet {
    fn from(mask: ChallengeMask) -> Self {
        Self::from_bits_truncate(mask.bits())
    }
}
