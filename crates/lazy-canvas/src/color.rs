//! CSS color parsing for `fillStyle`

/// Color (RGBA, straight alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Format as a CSS `rgba()` string with alpha in 0..=1
    pub fn to_css(&self) -> String {
        let alpha = self.a as f64 / 255.0;
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `rgb()`, `rgba()` or a few
    /// keywords.
    pub fn parse(input: &str) -> Option<Color> {
        let s = input.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        match s.as_str() {
            "black" => return Some(Self::BLACK),
            "white" => return Some(Self::WHITE),
            "transparent" => return Some(Self::TRANSPARENT),
            _ => {}
        }

        let args = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))?
            .strip_suffix(')')?;

        // rgb() accepts an alpha too in CSS Color 4
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if !(3..=4).contains(&parts.len()) {
            return None;
        }

        let channel = |v: &str| -> Option<u8> {
            let n: f64 = v.parse().ok()?;
            n.is_finite().then(|| n.round().clamp(0.0, 255.0) as u8)
        };
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = match parts.get(3) {
            Some(v) => {
                let alpha: f64 = v.parse().ok()?;
                if !alpha.is_finite() {
                    return None;
                }
                // Out-of-range alpha clamps to opaque, so an integer 255 means 1.0
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 255,
        };

        Some(Color::rgba(r, g, b, a))
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
        match hex.len() {
            3 => {
                let expand = |v: u8| v * 17;
                Some(Color::rgba(
                    expand(digit(0, 1)?),
                    expand(digit(1, 1)?),
                    expand(digit(2, 1)?),
                    255,
                ))
            }
            6 => Some(Color::rgba(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?, 255)),
            8 => Some(Color::rgba(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?, digit(6, 2)?)),
            _ => None,
        }
    }
}
