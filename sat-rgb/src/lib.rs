#![no_std]

//! An 8-bit rgb colour that can not leave the 0..=255 range.
//!
//! Every constructor clamps and every operation saturates, so there is no way to
//! produce a wrapped channel. The type is exactly one 32-bit word with 4-byte alignment,
//! which makes `Atomic<Rgb>` lock free on every platform with 32-bit atomics.

use bytemuck::{Pod, Zeroable};

/// opaque, the only alpha value this crate ever produces
const OPAQUE: u8 = u8::MAX;

/// a colour triple with a fixed opaque alpha byte.
///
/// the alpha byte only exists so that a slice of colours can be handed to a texture
/// upload as rgba8 without repacking, see [`as_bytes`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C, align(4))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    alpha: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(u8::MAX, u8::MAX, u8::MAX);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: OPAQUE,
        }
    }

    /// builds a colour from signed channels, clamping each into 0..=255
    pub fn clamped(r: i32, g: i32, b: i32) -> Self {
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    pub fn from_channels(c: [i32; 3]) -> Self {
        Self::clamped(c[0], c[1], c[2])
    }

    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// r + g + b, 0..=765
    pub fn brightness(self) -> u32 {
        self.r as u32 + self.g as u32 + self.b as u32
    }

    /// per channel addition that sticks at 255.
    ///
    /// unlike most saturating operations this one is commutative and associative:
    /// there is no lower bound to hit, so the order of several additions onto the same
    /// colour never changes the result.
    ///
    /// ```
    /// use sat_rgb::Rgb;
    /// let a = Rgb::new(200, 10, 0);
    /// let b = Rgb::new(100, 10, 0);
    /// assert_eq!(a.saturating_add(b), Rgb::new(255, 20, 0));
    /// assert_eq!(a.saturating_add(b), b.saturating_add(a));
    /// ```
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }

    /// moves each channel the fraction `t` of the way towards `target`.
    ///
    /// `t` is clamped to 0..=1 (nan counts as 0), the target may lie outside the channel
    /// range. intermediate values are truncated towards zero and the result is clamped,
    /// never wrapped.
    #[must_use]
    pub fn lerp_towards(self, target: [i32; 3], t: f64) -> Self {
        let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };
        let step = |from: u8, to: i32| {
            let from = from as f64;
            (from + (to as f64 - from) * t) as i32
        };
        Self::clamped(
            step(self.r, target[0]),
            step(self.g, target[1]),
            step(self.b, target[2]),
        )
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.channels()
    }
}

pub fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, u8::MAX as i32) as u8
}

/// views a slice of colours as rgba8 bytes, four per colour
pub fn as_bytes(pixels: &[Rgb]) -> &[u8] {
    bytemuck::cast_slice(pixels)
}

#[cfg(test)]
mod tests;

#[test]
fn word_sized() {
    assert_eq!(core::mem::size_of::<Rgb>(), 4);
    assert_eq!(core::mem::align_of::<Rgb>(), 4);
}

#[test]
fn byte_layout() {
    let px = [Rgb::new(1, 2, 3), Rgb::WHITE];
    assert_eq!(as_bytes(&px), &[1, 2, 3, 255, 255, 255, 255, 255]);
}

#[test]
fn clamps() {
    assert_eq!(Rgb::clamped(-20, 300, 128), Rgb::new(0, 255, 128));
    assert_eq!(Rgb::from_channels([i32::MIN, i32::MAX, 0]), Rgb::new(0, 255, 0));
}

#[test]
fn brightness_sums_channels() {
    assert_eq!(Rgb::WHITE.brightness(), 765);
    assert_eq!(Rgb::new(1, 2, 3).brightness(), 6);
}

#[test]
fn lerp_edges() {
    let c = Rgb::new(100, 100, 100);
    assert_eq!(c.lerp_towards([0, 50, 255], 0.), c);
    assert_eq!(c.lerp_towards([0, 50, 255], 1.), Rgb::new(0, 50, 255));
    // t outside 0..=1 is clamped
    assert_eq!(c.lerp_towards([0, 50, 255], 7.), Rgb::new(0, 50, 255));
    assert_eq!(c.lerp_towards([0, 50, 255], f64::NAN), c);
    // negative targets pull down but never wrap
    assert_eq!(c.lerp_towards([-300, -300, -300], 1.), Rgb::BLACK);
    assert_eq!(c.lerp_towards([-100, -100, -100], 0.5), Rgb::BLACK);
    assert_eq!(c.lerp_towards([0, 0, 0], 0.5), Rgb::new(50, 50, 50));
}
