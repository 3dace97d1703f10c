//! Deterministic fallback colors for regions without a colortable entry.
//!
//! Colors come from a SplitMix64 generator seeded with the region ordinal, so the same
//! ordinal always yields the same color, across runs and platforms.

use serde::Serialize;

/// An RGBA display color with one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Build a color from colortable channel values, clamping each into the byte range.
    pub fn from_channels(r: i32, g: i32, b: i32, a: i32) -> Rgba {
        let clamp = |c: i32| c.clamp(0, 255) as u8;
        Rgba {
            r: clamp(r),
            g: clamp(g),
            b: clamp(b),
            a: clamp(a),
        }
    }
}

/// The SplitMix64 pseudo-random generator.
///
/// State advances by the constant `0x9E3779B97F4A7C15`, output is mixed with the finalizer of
/// MurmurHash3-style multiplications by `0xBF58476D1CE4E5B9` and `0x94D049BB133111EB`.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> SplitMix64 {
        SplitMix64 { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// A value in `[low, high)`. Requires `low < high`.
    pub fn next_in_range(&mut self, low: u8, high: u8) -> u8 {
        let span = (high - low) as u64;
        low + (self.next_u64() % span) as u8
    }
}

/// Lower (inclusive) bound of synthesized color channels.
pub const FALLBACK_CHANNEL_MIN: u8 = 50;
/// Upper (exclusive) bound of synthesized color channels.
pub const FALLBACK_CHANNEL_MAX: u8 = 200;

/// Synthesize an opaque color for the region at the given ordinal.
///
/// # Examples
///
/// ```
/// use surfjson::color::fallback_color;
/// assert_eq!(fallback_color(3), fallback_color(3));
/// assert_eq!(fallback_color(3).a, 255);
/// ```
pub fn fallback_color(ordinal: usize) -> Rgba {
    let mut rng = SplitMix64::new(ordinal as u64);
    let r = rng.next_in_range(FALLBACK_CHANNEL_MIN, FALLBACK_CHANNEL_MAX);
    let g = rng.next_in_range(FALLBACK_CHANNEL_MIN, FALLBACK_CHANNEL_MAX);
    let b = rng.next_in_range(FALLBACK_CHANNEL_MIN, FALLBACK_CHANNEL_MAX);
    Rgba { r, g, b, a: 255 }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splitmix64_matches_the_reference_sequence() {
        // First outputs of SplitMix64 seeded with 0.
        let mut rng = SplitMix64::new(0);
        assert_eq!(0xE220_A839_7B1D_CDAF, rng.next_u64());
        assert_eq!(0x6E78_9E6A_A1B9_65F4, rng.next_u64());
    }

    #[test]
    fn fallback_colors_are_stable_and_in_range() {
        for ordinal in 0..200 {
            let c = fallback_color(ordinal);
            assert_eq!(c, fallback_color(ordinal));
            for ch in [c.r, c.g, c.b] {
                assert!((FALLBACK_CHANNEL_MIN..FALLBACK_CHANNEL_MAX).contains(&ch));
            }
            assert_eq!(255, c.a);
        }
    }

    #[test]
    fn different_ordinals_usually_differ() {
        assert_ne!(fallback_color(1), fallback_color(2));
    }

    #[test]
    fn colortable_channels_are_clamped() {
        assert_eq!(Rgba { r: 0, g: 255, b: 10, a: 0 }, Rgba::from_channels(-5, 300, 10, 0));
    }
}
