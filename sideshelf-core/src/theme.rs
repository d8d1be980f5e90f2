//! Per-app theme colors
//!
//! Each record's tint drives a readable text color (YIQ contrast) and four
//! lightness-clamped variants for light/dark surfaces.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::AppRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Render as `r, g, b` for use inside `rgb(...)`
    pub fn to_triplet(self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }
}

/// Parse `#rgb`, `rgb`, `#rrggbb` or `rrggbb`
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let hex = hex.trim().trim_start_matches('#');

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();

    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Black or white, whichever reads better on `hex`; white when unparsable
pub fn contrast_color(hex: &str) -> &'static str {
    let Some(rgb) = parse_hex(hex) else {
        return "#ffffff";
    };

    let yiq = (f64::from(rgb.r) * 299.0 + f64::from(rgb.g) * 587.0 + f64::from(rgb.b) * 114.0)
        / 1000.0;

    if yiq >= 128.0 {
        "#000000"
    } else {
        "#ffffff"
    }
}

pub fn rgb_to_hsl(rgb: Rgb) -> (f64, f64, f64) {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, s, l)
}

pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if s == 0.0 {
        let v = to_byte(l);
        return Rgb { r: v, g: v, b: v };
    }

    let hue_to_rgb = |p: f64, q: f64, mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    };

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb {
        r: to_byte(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        g: to_byte(hue_to_rgb(p, q, h)),
        b: to_byte(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    }
}

/// Tint variants clamped for legibility, as `r, g, b` triplets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessibleColors {
    pub text_light: String,
    pub text_dark: String,
    pub decor_light: String,
    pub decor_dark: String,
}

pub fn accessible_colors(hex: &str) -> AccessibleColors {
    let Some(rgb) = parse_hex(hex) else {
        return AccessibleColors {
            text_light: "0,0,0".to_string(),
            text_dark: "255,255,255".to_string(),
            decor_light: "0,0,0".to_string(),
            decor_dark: "255,255,255".to_string(),
        };
    };

    let (h, s, l) = rgb_to_hsl(rgb);

    AccessibleColors {
        text_light: hsl_to_rgb(h, s, l.min(0.4)).to_triplet(),
        text_dark: hsl_to_rgb(h, s.min(0.8), l.max(0.7)).to_triplet(),
        decor_light: hsl_to_rgb(h, s, l.min(0.6)).to_triplet(),
        decor_dark: hsl_to_rgb(h, s, l.max(0.4)).to_triplet(),
    }
}

/// Resolved theme for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppTheme {
    pub tint: String,
    pub text_color: &'static str,
    pub colors: AccessibleColors,
}

impl AppTheme {
    pub fn for_tint(tint: &str) -> Self {
        Self {
            tint: tint.to_string(),
            text_color: contrast_color(tint),
            colors: accessible_colors(tint),
        }
    }
}

/// Memoizes themes by tint; catalogs reuse a handful of tints
#[derive(Debug, Default)]
pub struct ThemeCache {
    themes: HashMap<String, AppTheme>,
}

impl ThemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme_for(&mut self, app: &AppRecord) -> &AppTheme {
        let tint = app.tint();
        self.themes
            .entry(tint.to_string())
            .or_insert_with(|| AppTheme::for_tint(tint))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
