use std::fmt;
use enum_iterator::{all, Sequence};

/// The three social battery statuses a badge can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Sequence)]
pub enum StatusColor {
    #[default]
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    pub fn all() -> Vec<StatusColor> {
        all::<StatusColor>().collect::<Vec<_>>()
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusColor::Green => "Open",
            StatusColor::Yellow => "Selective",
            StatusColor::Red => "Do Not Disturb",
        }
    }

    /// Where the color sits on the 0..=100 slider.
    pub fn slider_position(&self) -> u8 {
        match self {
            StatusColor::Green => 0,
            StatusColor::Yellow => 50,
            StatusColor::Red => 100,
        }
    }

    /// The color whose zone contains `value`. Zone borders go to the calmer color.
    pub fn from_slider(value: u8) -> StatusColor {
        match value {
            0..=25 => StatusColor::Green,
            26..=75 => StatusColor::Yellow,
            _ => StatusColor::Red,
        }
    }

    /// The text stored in the NFC record.
    pub fn record_text(&self) -> &'static str {
        match self {
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Red => "red",
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, StatusColor::Green)]
    #[case(25, StatusColor::Green)]
    #[case(26, StatusColor::Yellow)]
    #[case(50, StatusColor::Yellow)]
    #[case(75, StatusColor::Yellow)]
    #[case(76, StatusColor::Red)]
    #[case(100, StatusColor::Red)]
    fn slider_zones(#[case] value: u8, #[case] expected: StatusColor) {
        assert_eq!(StatusColor::from_slider(value), expected);
    }

    #[test]
    fn slider_positions_map_back_to_their_color() {
        for color in StatusColor::all() {
            assert_eq!(StatusColor::from_slider(color.slider_position()), color);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(StatusColor::Green.label(), "Open");
        assert_eq!(StatusColor::Yellow.label(), "Selective");
        assert_eq!(StatusColor::Red.label(), "Do Not Disturb");
    }
}
