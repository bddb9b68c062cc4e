/*
Packed Stereo Frames
====================

The output transport consumes 16-bit stereo, left/right interleaved, four
bytes per frame. We keep a frame as one u32 word so a whole frame moves with a
single load or store:

    bit 31           16 15            0
        ┌──────────────┬──────────────┐
        │  left (i16)  │  right (i16) │
        └──────────────┴──────────────┘

Every voice writes the same value into both lanes (the synth is mono), but
the lanes are kept separate through all arithmetic: negation and addition
work per lane, so a negative right lane never borrows from the left one.

Lane arithmetic wraps rather than saturates. Per-voice amplitudes are scaled
so the whole pool summed at peak fits in an i16, so wrapping never happens
in practice, and when it does the headroom check reports it.
*/

use std::ops::{AddAssign, Neg};

/// One stereo frame: two signed 16-bit lanes packed into a single word,
/// left in the high half and right in the low half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct StereoSample(u32);

impl StereoSample {
    /// The base level every idle voice emits.
    pub const SILENCE: StereoSample = StereoSample(0);

    /// Duplicate a mono value into both lanes.
    pub const fn from_mono(value: i16) -> Self {
        Self::from_lanes(value, value)
    }

    pub const fn from_lanes(left: i16, right: i16) -> Self {
        Self(((left as u16 as u32) << 16) | right as u16 as u32)
    }

    pub const fn to_bits(self) -> u32 {
        self.0
    }

    pub const fn left(self) -> i16 {
        (self.0 >> 16) as u16 as i16
    }

    pub const fn right(self) -> i16 {
        self.0 as u16 as i16
    }

    /// Lane-wise two's complement negation.
    pub const fn negate(self) -> Self {
        Self::from_lanes(self.left().wrapping_neg(), self.right().wrapping_neg())
    }

    /// Lane-wise wrapping addition.
    pub const fn wrapping_add(self, other: Self) -> Self {
        Self::from_lanes(
            self.left().wrapping_add(other.left()),
            self.right().wrapping_add(other.right()),
        )
    }

    /// Largest lane magnitude.
    pub const fn magnitude(self) -> u16 {
        let left = self.left().unsigned_abs();
        let right = self.right().unsigned_abs();
        if left > right {
            left
        } else {
            right
        }
    }

    /// Both lanes scaled to [-1.0, 1.0].
    pub fn to_f32(self) -> (f32, f32) {
        let scale = 1.0 / f32::from(i16::MAX);
        (
            f32::from(self.left()) * scale,
            f32::from(self.right()) * scale,
        )
    }
}

impl Neg for StereoSample {
    type Output = StereoSample;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl AddAssign for StereoSample {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.wrapping_add(rhs);
    }
}

/// Count the frames in `buffer` whose magnitude is above `limit`.
pub fn count_over_headroom(buffer: &[StereoSample], limit: u16) -> usize {
    buffer.iter().filter(|s| s.magnitude() > limit).count()
}
