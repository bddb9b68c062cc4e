/*
Quarter-Wave Oscillator
=======================

An oscillator plays one note by walking a shared quarter-wave table. It never
computes a waveform value itself: every sample it emits is a table entry,
optionally negated.

Vocabulary
----------

  cursor      Index of the next table entry to emit. Always inside
              [0, end], where end = table length - 1.

  stride      How far the cursor moves per sample. 1 for the octave the
              table was built for, 2 one octave up, 4 two octaves up...

  pass        One walk over the table, forwards or backwards. Four passes
              make one cycle.

  correction  Fixed-point fraction of a sample the integer walk loses each
              half-cycle, in units of 1/CORRECTION_THRESHOLD samples.

  error       Accumulated correction. When it grows past the threshold the
              oscillator emits one extra sample and pays the threshold back.


The State Machine
-----------------

    ┌──────┐  bind   ┌────┐ past end ┌──────┐ at start ┌─────────────┐
    │ Idle │ ──────→ │ Up │ ───┬───→ │ Down │ ───┬───→ │ UpInverted  │
    └──────┘         └────┘    │     └──────┘    │     └─────────────┘
        ↑              ↑       │         ↑       │            │ past end
        │              │       ↓         │       │            ↓
        │              │  ┌──────────────┐       │     ┌──────────────┐
        │              │  │ ExtraAfterUp │       │     │ExtraAfterDown│
        │              │  └──────────────┘       │     └──────────────┘
        │              │                         │            │
        │              │ at start ┌──────────────┐            │
        │              └───────── │ DownInverted │ ←──────────┘
        │                         └──────────────┘
        └──────────── stop requested ────────────┘ (only from Down)

  Up            emit table[cursor], cursor += stride
  Down          emit table[cursor], cursor -= stride
  UpInverted    emit -table[cursor], cursor += stride
  DownInverted  emit -table[cursor], cursor -= stride
  ExtraAfter*   emit table[end] (negated after UpInverted) once more

The forward passes leave the cursor parked on the last entry; the reverse
passes start from there. At the end of each forward pass the correction is
added to the error; if the error then exceeds the threshold we go through
the matching Extra state before reversing.


Why Stop Only at the End of Down
--------------------------------

After Down the waveform has completed its positive half and sits at the zero
crossing. Stopping there means the voice falls silent from (almost) zero
instead of from wherever it happened to be, so releasing a note never
clicks. A stop requested anywhere else waits until the next Down completes,
at most one cycle later.


Timing Correction
-----------------

A half-cycle emitted by the walk is an integer number of samples, but the
real half-period sr / (2 f) usually is not. Left alone, the leftover fraction
makes every cycle slightly short and the note drifts flat-to-sharp against
its true pitch. This is a digital differential analyzer:

    error += correction           (once per half-cycle)
    if error > THRESHOLD:
        emit one extra sample
        error -= THRESHOLD

Over many cycles the extra samples add up to exactly the missing fraction,
so the long-run period matches sr / f without fractional interpolation.
*/

use std::sync::Arc;

use crate::dsp::{sample::StereoSample, wavetable::WaveTable};

/// Error level at which one extra sample is inserted into a half-cycle.
pub const CORRECTION_THRESHOLD: u32 = 50_000;

/// Where an oscillator is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OscState {
    /// Not playing; emits silence.
    Idle = 0,
    /// First quarter: forwards, as stored.
    Up = 1,
    /// Second quarter: backwards, as stored.
    Down = 2,
    /// Third quarter: forwards, negated.
    UpInverted = 3,
    /// Fourth quarter: backwards, negated.
    DownInverted = 4,
    /// One extra peak sample between `Up` and `Down`.
    ExtraAfterUp = 5,
    /// One extra negated peak sample between `UpInverted` and `DownInverted`.
    ExtraAfterDown = 6,
}

/// The mutable part of an oscillator that `step` advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub state: OscState,
    pub cursor: usize,
    pub error: u32,
}

impl Phase {
    pub const IDLE: Phase = Phase {
        state: OscState::Idle,
        cursor: 0,
        error: 0,
    };

    /// Start of a fresh cycle.
    pub const START: Phase = Phase {
        state: OscState::Up,
        cursor: 0,
        error: 0,
    };
}

/// The per-binding inputs to `step` that it never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    pub stride: usize,
    pub correction: u32,
    pub stopping: bool,
}

/// Advance the automaton by exactly one sample.
///
/// Returns the next phase and the sample emitted on the way. This is the
/// whole playback logic; `Oscillator` only stores the phase between calls.
pub fn step(phase: Phase, walk: Walk, table: &[StereoSample]) -> (Phase, StereoSample) {
    let Some(end) = table.len().checked_sub(1) else {
        return (Phase::IDLE, StereoSample::SILENCE);
    };
    let Phase {
        state,
        cursor,
        error,
    } = phase;

    match state {
        OscState::Idle => (phase, StereoSample::SILENCE),
        OscState::Up => (
            forward(phase, walk, end, OscState::Down, OscState::ExtraAfterUp),
            table[cursor],
        ),
        OscState::Down => {
            let after = if walk.stopping {
                OscState::Idle
            } else {
                OscState::UpInverted
            };
            (backward(phase, walk, after), table[cursor])
        }
        OscState::UpInverted => (
            forward(
                phase,
                walk,
                end,
                OscState::DownInverted,
                OscState::ExtraAfterDown,
            ),
            -table[cursor],
        ),
        OscState::DownInverted => (backward(phase, walk, OscState::Up), -table[cursor]),
        OscState::ExtraAfterUp => (
            Phase {
                state: OscState::Down,
                cursor: end,
                error: error.saturating_sub(CORRECTION_THRESHOLD),
            },
            table[end],
        ),
        OscState::ExtraAfterDown => (
            Phase {
                state: OscState::DownInverted,
                cursor: end,
                error: error.saturating_sub(CORRECTION_THRESHOLD),
            },
            -table[end],
        ),
    }
}

fn forward(phase: Phase, walk: Walk, end: usize, reverse: OscState, extra: OscState) -> Phase {
    let next = phase.cursor + walk.stride;
    if next <= end {
        return Phase {
            cursor: next,
            ..phase
        };
    }

    let error = phase.error.saturating_add(walk.correction);
    let state = if error > CORRECTION_THRESHOLD {
        extra
    } else {
        reverse
    };
    Phase {
        state,
        cursor: end,
        error,
    }
}

fn backward(phase: Phase, walk: Walk, after: OscState) -> Phase {
    match phase.cursor.checked_sub(walk.stride) {
        Some(next) => Phase {
            cursor: next,
            ..phase
        },
        None => Phase {
            state: after,
            cursor: 0,
            error: phase.error,
        },
    }
}

/// One voice: a quarter-wave walk bound to a shared table.
#[derive(Debug)]
pub struct Oscillator {
    phase: Phase,
    table: Option<Arc<WaveTable>>,
    stride: usize,
    correction: u32,
    stopping: bool,
}

impl Oscillator {
    pub fn new() -> Self {
        Self {
            phase: Phase::IDLE,
            table: None,
            stride: 1,
            correction: 0,
            stopping: false,
        }
    }

    /// Start playing `table` from its first entry.
    ///
    /// Resets the error and clears any pending stop, so a voice can be rebound
    /// straight from the free list.
    pub fn bind(&mut self, table: Arc<WaveTable>, stride: usize, correction: u32) {
        self.table = Some(table);
        self.stride = stride.max(1);
        self.correction = correction;
        self.stopping = false;
        self.phase = Phase::START;
    }

    /// Ask the voice to fall silent at its next zero crossing.
    pub fn request_stop(&mut self) {
        self.stopping = true;
    }

    /// True exactly once: the first time the voice is seen idle after a stop
    /// was requested.
    pub fn poll_stopped(&mut self) -> bool {
        if self.stopping && self.phase.state == OscState::Idle {
            self.stopping = false;
            return true;
        }
        false
    }

    /// Overwrite `buffer` with the next `buffer.len()` samples.
    pub fn write_frame(&mut self, buffer: &mut [StereoSample]) {
        self.render(buffer, |out, sample| *out = sample);
    }

    /// Add the next `buffer.len()` samples into `buffer`.
    pub fn accumulate_frame(&mut self, buffer: &mut [StereoSample]) {
        self.render(buffer, |out, sample| *out += sample);
    }

    fn render<F>(&mut self, buffer: &mut [StereoSample], mut emit: F)
    where
        F: FnMut(&mut StereoSample, StereoSample),
    {
        let walk = self.walk();
        let Some(table) = self.table.as_deref() else {
            for out in buffer.iter_mut() {
                emit(out, StereoSample::SILENCE);
            }
            return;
        };

        let frames = table.frames();
        let mut phase = self.phase;
        for out in buffer.iter_mut() {
            let (next, sample) = step(phase, walk, frames);
            emit(out, sample);
            phase = next;
        }
        self.phase = phase;
    }

    fn walk(&self) -> Walk {
        Walk {
            stride: self.stride,
            correction: self.correction,
            stopping: self.stopping,
        }
    }

    pub fn state(&self) -> OscState {
        self.phase.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase.state == OscState::Idle
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn correction(&self) -> u32 {
        self.correction
    }

    pub fn table(&self) -> Option<&Arc<WaveTable>> {
        self.table.as_ref()
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}
