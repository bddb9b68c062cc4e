//! Computer keyboard to MIDI pitch mapping
//!
//! Two rows laid out like a piano: the home row plays the white keys of one
//! octave and the row above it plays the black keys.
//!
//!    w e   t y u
//!   a s d f g h j k
//!   C D E F G A B C

use quarterwave::{MAX_PITCH, MIN_PITCH};

/// Keys in semitone order from C.
const KEYS: [char; 13] = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k'];

pub const MIN_OCTAVE: i8 = 0;
pub const MAX_OCTAVE: i8 = 8;

/// Which octave the home row plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyboard {
    octave: i8,
}

impl Keyboard {
    pub fn new(octave: i8) -> Self {
        Self {
            octave: octave.clamp(MIN_OCTAVE, MAX_OCTAVE),
        }
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn octave_down(&mut self) {
        self.octave = (self.octave - 1).max(MIN_OCTAVE);
    }

    pub fn octave_up(&mut self) {
        self.octave = (self.octave + 1).min(MAX_OCTAVE);
    }

    /// MIDI pitch for `key`, if it is a note key and the note is playable.
    pub fn pitch(&self, key: char) -> Option<u8> {
        let offset = KEYS.iter().position(|&k| k == key.to_ascii_lowercase())?;
        let pitch = 12 * (i32::from(self.octave) + 1) + offset as i32;
        u8::try_from(pitch)
            .ok()
            .filter(|p| (MIN_PITCH..=MAX_PITCH).contains(p))
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_row_starts_on_c() {
        let keys = Keyboard::default();
        assert_eq!(keys.pitch('a'), Some(60));
        assert_eq!(keys.pitch('h'), Some(69));
        assert_eq!(keys.pitch('K'), Some(72));
        assert_eq!(keys.pitch('q'), None);
    }

    #[test]
    fn octave_shift_is_clamped() {
        let mut keys = Keyboard::new(MIN_OCTAVE);
        keys.octave_down();
        assert_eq!(keys.octave(), MIN_OCTAVE);
        // C0 and friends sit below A0.
        assert_eq!(keys.pitch('a'), None);
        assert_eq!(keys.pitch('h'), Some(21));

        let mut keys = Keyboard::new(MAX_OCTAVE);
        keys.octave_up();
        assert_eq!(keys.octave(), MAX_OCTAVE);
        assert_eq!(keys.pitch('a'), Some(108));
    }
}
