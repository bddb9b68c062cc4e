#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::wavetable::WaveStyle;

/// Control events for a `PolySynth`.
///
/// Pushed by whatever decodes the input protocol and drained by the audio side
/// at the start of each frame, so note changes never interleave with a frame
/// fill.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
    SetStyle(WaveStyle),
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Lets plain queues stand in for a ring buffer, mostly in tests.
impl MessageReceiver for std::collections::VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}
