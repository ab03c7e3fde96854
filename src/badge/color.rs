use crate::badge::types::StatusColor;

/// hue in degrees, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

const GREEN: Hsl = Hsl { h: 142.0, s: 76.0, l: 45.0 };
const YELLOW: Hsl = Hsl { h: 45.0, s: 93.0, l: 58.0 };
const RED: Hsl = Hsl { h: 0.0, s: 72.0, l: 55.0 };

impl Hsl {
    fn lerp(from: Hsl, to: Hsl, t: f32) -> Hsl {
        Hsl {
            h: from.h + (to.h - from.h) * t,
            s: from.s + (to.s - from.s) * t,
            l: from.l + (to.l - from.l) * t,
        }
    }

    /// Converts to RGB components in `[0, 1]`.
    pub fn to_rgb(&self) -> [f32; 3] {
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        let h = self.h.rem_euclid(360.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h_prime = h / 60.0;
        let x = chroma * (1.0 - (h_prime % 2.0 - 1.0).abs());

        let (r, g, b) = match h_prime as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let m = l - chroma / 2.0;
        [r + m, g + m, b + m]
    }
}

/// Badge color for a slider position: green at 0, yellow at 50, red at 100, linear in between.
pub fn interpolate(value: f32) -> Hsl {
    let value = value.clamp(0.0, 100.0);

    if value <= 50.0 {
        Hsl::lerp(GREEN, YELLOW, value / 50.0)
    } else {
        Hsl::lerp(YELLOW, RED, (value - 50.0) / 50.0)
    }
}

pub fn status_hsl(color: StatusColor) -> Hsl {
    interpolate(f32::from(color.slider_position()))
}
