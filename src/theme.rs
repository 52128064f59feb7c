//! Network colors and terminal palette.
//!
//! A network's `color` is either a hex color (`#E6007A`, `#e6007a`, `#fff`)
//! or an arbitrary CSS background such as a gradient. The web front end uses
//! [`ChainColor::css_background`]; the terminal needs a single RGB value and
//! takes the first hex stop found in the string.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// WCAG relative luminance.
    pub fn luminance(self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let Rgb(r, g, b) = self;
        0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
    }

    pub fn contrast(self, other: Rgb) -> f64 {
        let (a, b) = (self.luminance(), other.luminance());
        let (hi, lo) = if a > b { (a, b) } else { (b, a) };
        (hi + 0.05) / (lo + 0.05)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Color {
        Color::Rgb(r, g, b)
    }
}

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);

/// Parsed network color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainColor {
    Solid(Rgb),
    /// Anything that is not a plain hex color; `accent` is its first hex stop.
    Css { value: String, accent: Option<Rgb> },
}

impl ChainColor {
    pub fn parse(raw: &str) -> ChainColor {
        let s = raw.trim();
        if let Some(rgb) = parse_hex(s) {
            return ChainColor::Solid(rgb);
        }
        ChainColor::Css {
            value: s.to_string(),
            accent: first_hex_stop(s),
        }
    }

    /// Inline CSS for a swatch or page background.
    pub fn css_background(&self) -> String {
        match self {
            ChainColor::Solid(rgb) => format!("background-color: {}", rgb.to_hex()),
            ChainColor::Css { value, .. } => format!("background: {value}"),
        }
    }

    pub fn accent(&self) -> Option<Rgb> {
        match self {
            ChainColor::Solid(rgb) => Some(*rgb),
            ChainColor::Css { accent, .. } => *accent,
        }
    }

    /// Black or white, whichever reads better on top of the accent.
    pub fn foreground(&self) -> Rgb {
        match self.accent() {
            Some(bg) if bg.contrast(BLACK) >= bg.contrast(WHITE) => BLACK,
            _ => WHITE,
        }
    }
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(Rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 | 8 => Some(Rgb(byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

fn first_hex_stop(s: &str) -> Option<Rgb> {
    let start = s.find('#')?;
    let rest = &s[start..];
    let end = rest[1..]
        .find(|c: char| !c.is_ascii_hexdigit())
        .map(|i| i + 1)
        .unwrap_or(rest.len());
    parse_hex(&rest[..end])
}

/// Terminal chrome colors. The accent follows the active network.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub ok: Color,
    pub warn: Color,
    pub error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::Gray,
            border: Color::DarkGray,
            ok: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(ChainColor::parse("#E6007A"), ChainColor::Solid(Rgb(0xe6, 0x00, 0x7a)));
        assert_eq!(ChainColor::parse("#fff"), ChainColor::Solid(WHITE));
        assert_eq!(ChainColor::parse(" #000000ff "), ChainColor::Solid(BLACK));
    }

    #[test]
    fn gradient_keeps_css_and_first_stop() {
        let c = ChainColor::parse("linear-gradient(90deg, #12b1ff 0%, #8a3ffc 100%)");
        assert_eq!(c.accent(), Some(Rgb(0x12, 0xb1, 0xff)));
        assert_eq!(
            c.css_background(),
            "background: linear-gradient(90deg, #12b1ff 0%, #8a3ffc 100%)"
        );
    }

    #[test]
    fn named_color_has_no_accent() {
        let c = ChainColor::parse("rebeccapurple");
        assert_eq!(c.accent(), None);
        assert_eq!(c.foreground(), WHITE);
    }

    #[test]
    fn solid_css() {
        assert_eq!(
            ChainColor::parse("#E6007A").css_background(),
            "background-color: #e6007a"
        );
    }

    #[test]
    fn foreground_contrast() {
        assert_eq!(ChainColor::parse("#ffff00").foreground(), BLACK);
        assert_eq!(ChainColor::parse("#000080").foreground(), WHITE);
        assert!(WHITE.contrast(BLACK) > 20.0);
    }
}
