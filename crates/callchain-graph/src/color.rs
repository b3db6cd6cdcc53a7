//! Generation of visually distinct dark colours.
//!
//! Colours are sampled in HSB space inside a dark, saturated box and the
//! candidate furthest from every colour already in use wins. The search is a
//! bounded greedy heuristic: it evaluates a fixed number of random candidates
//! rather than solving for the optimum.
#![expect(
    clippy::float_arithmetic,
    reason = "colour conversion is defined over f32 components"
)]

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of random candidates scored per generated colour.
pub const CANDIDATE_COUNT: usize = 50;

const MIN_BRIGHTNESS: f32 = 0.55;
const MAX_BRIGHTNESS: f32 = 0.80;
const MIN_SATURATION: f32 = 0.70;
const MAX_SATURATION: f32 = 1.0;

const HUE_WEIGHT: f32 = 3.0;

/// A colour in hue/saturation/brightness space, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    /// Hue, wrapping at 1.0.
    pub hue: f32,
    /// Saturation.
    pub saturation: f32,
    /// Brightness.
    pub brightness: f32,
}

impl Hsb {
    /// Creates a colour from its components.
    #[must_use]
    pub const fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Weighted perceptual distance to another colour.
    ///
    /// Hue counts three times as much as saturation or brightness and wraps
    /// around the colour wheel.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let raw_hue = (self.hue - other.hue).abs();
        let hue = raw_hue.min(1.0 - raw_hue);
        let saturation = (self.saturation - other.saturation).abs();
        let brightness = (self.brightness - other.brightness).abs();
        HUE_WEIGHT * hue + saturation + brightness
    }

    /// Converts to an RGB triple.
    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        if self.saturation <= 0.0 {
            let level = channel(self.brightness);
            return [level, level, level];
        }

        let sector = (self.hue - self.hue.floor()) * 6.0;
        let fraction = sector - sector.floor();
        let b = self.brightness;
        let p = b * (1.0 - self.saturation);
        let q = b * (1.0 - self.saturation * fraction);
        let t = b * (1.0 - self.saturation * (1.0 - fraction));

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "sector lies in [0, 6)"
        )]
        let (red, green, blue) = match sector.floor() as u8 {
            0 => (b, t, p),
            1 => (q, b, p),
            2 => (p, b, t),
            3 => (p, q, b),
            4 => (t, p, b),
            _ => (b, p, q),
        };
        [channel(red), channel(green), channel(blue)]
    }

    /// Converts an RGB triple back into HSB.
    #[must_use]
    pub fn from_rgb([red, green, blue]: [u8; 3]) -> Self {
        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let brightness = f32::from(max) / 255.0;
        if max == min {
            return Self::new(0.0, 0.0, brightness);
        }

        let saturation = f32::from(max - min) / f32::from(max);
        let spread = f32::from(max - min);
        let red_c = f32::from(max - red) / spread;
        let green_c = f32::from(max - green) / spread;
        let blue_c = f32::from(max - blue) / spread;
        let mut hue = if red == max {
            blue_c - green_c
        } else if green == max {
            2.0 + red_c - blue_c
        } else {
            4.0 + green_c - red_c
        } / 6.0;
        if hue < 0.0 {
            hue += 1.0;
        }
        Self::new(hue, saturation, brightness)
    }

    /// Formats the colour as lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [red, green, blue] = self.to_rgb();
        format!("#{red:02x}{green:02x}{blue:02x}")
    }

    /// Parses a `#rrggbb` string. Returns `None` for anything else.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        #[expect(
            clippy::big_endian_bytes,
            reason = "hex digits are written most significant first"
        )]
        let [_, red, green, blue] = value.to_be_bytes();
        Some(Self::from_rgb([red, green, blue]))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "component is clamped into the u8 range first"
)]
fn channel(component: f32) -> u8 {
    (component * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

/// Produces colours that stay well separated from a set of existing ones.
#[derive(Debug)]
pub struct DistinctColorGenerator<R = StdRng> {
    rng: R,
}

impl DistinctColorGenerator<StdRng> {
    /// Creates a generator seeded from system entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a generator with a fixed seed for reproducible palettes.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DistinctColorGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DistinctColorGenerator<R> {
    /// Wraps an arbitrary random number generator.
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a colour maximising the minimum distance to `existing`.
    ///
    /// Entries of `existing` that are not valid `#rrggbb` strings are
    /// ignored. When nothing usable exists, a single random colour from the
    /// dark box is returned without scoring.
    pub fn generate<S>(&mut self, existing: &HashSet<String, S>) -> String
    where
        S: std::hash::BuildHasher,
    {
        let existing_hsb: Vec<Hsb> = existing
            .iter()
            .filter_map(|hex| Hsb::from_hex(hex))
            .collect();
        if existing_hsb.is_empty() {
            return self.random_dark().to_hex();
        }

        let mut best: Option<(f32, Hsb)> = None;
        for _ in 0..CANDIDATE_COUNT {
            let candidate = self.random_dark();
            let score = existing_hsb
                .iter()
                .map(|color| candidate.distance(*color))
                .fold(f32::INFINITY, f32::min);
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }

        best.map_or_else(|| self.random_dark(), |(_, color)| color)
            .to_hex()
    }

    fn random_dark(&mut self) -> Hsb {
        let hue = self.rng.r#gen::<f32>();
        let saturation = self.rng.r#gen::<f32>() * (MAX_SATURATION - MIN_SATURATION) + MIN_SATURATION;
        let brightness = self.rng.r#gen::<f32>() * (MAX_BRIGHTNESS - MIN_BRIGHTNESS) + MIN_BRIGHTNESS;
        Hsb::new(hue, saturation, brightness)
    }
}
