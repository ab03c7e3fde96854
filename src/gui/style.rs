use iced::{Background, Border, Color, Shadow, Theme, Vector};
use iced::widget::button::{self, Appearance};
use iced::widget::container;

use crate::badge::color::Hsl;

pub fn hsl_color(hsl: Hsl) -> Color {
    let [r, g, b] = hsl.to_rgb();
    Color::from_rgb(r, g, b)
}

fn glow(color: Color) -> Color {
    Color { a: 0.5, ..color }
}

/// Round color picker button, glowing when selected.
pub struct ColorDotStyleSheet {
    pub color: Color,
    pub selected: bool,
}

impl button::StyleSheet for ColorDotStyleSheet {
    type Style = Theme;

    fn active(&self, style: &Self::Style) -> Appearance {
        let (border_width, blur_radius) = if self.selected { (3.0, 20.0) } else { (0.0, 8.0) };

        Appearance {
            shadow_offset: Vector::default(),
            background: Some(Background::Color(self.color)),
            text_color: Color::BLACK,
            border: Border {
                color: style.palette().background,
                width: border_width,
                radius: 24.0.into(),
            },
            shadow: Shadow {
                color: if self.selected { glow(self.color) } else { Color::from_rgba(0.0, 0.0, 0.0, 0.2) },
                offset: Vector::new(0.0, 2.0),
                blur_radius,
            },
        }
    }
}

/// The badge preview: a disc in the interpolated status color.
pub struct BadgeStyleSheet {
    pub color: Color,
}

impl container::StyleSheet for BadgeStyleSheet {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(Color::BLACK),
            background: Some(Background::Color(self.color)),
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 80.0.into(),
            },
            shadow: Shadow {
                color: glow(self.color),
                offset: Vector::default(),
                blur_radius: 40.0,
            },
        }
    }
}

/// Borderless button that only shows its label.
pub struct TextButtonStyleSheet;

impl button::StyleSheet for TextButtonStyleSheet {
    type Style = Theme;

    fn active(&self, style: &Self::Style) -> Appearance {
        Appearance {
            shadow_offset: Default::default(),
            background: None,
            text_color: style.palette().text,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 0.0.into(),
            },
            shadow: Shadow::default(),
        }
    }
}
