//! Hand-off from fixed-size synth frames to a host audio callback.
//!
//! Host callbacks ask for whatever buffer length the device likes, in float,
//! with any channel count. `FramePump` keeps the remainder of the last pulled
//! frame so every sample the synth produces is played exactly once.

use crate::{
    dsp::sample::StereoSample,
    synth::{message::MessageReceiver, poly::PolySynth},
};

/// Write `frames` into interleaved `out` with `channels` channels.
///
/// Mono devices get the average of both lanes; channels past the second are
/// silent. Returns the number of frames written.
pub fn write_interleaved(frames: &[StereoSample], out: &mut [f32], channels: usize) -> usize {
    if channels == 0 {
        return 0;
    }

    let mut written = 0;
    for (frame, sample) in out.chunks_exact_mut(channels).zip(frames) {
        let (left, right) = sample.to_f32();
        match frame {
            [mono] => *mono = (left + right) * 0.5,
            [l, r, rest @ ..] => {
                *l = left;
                *r = right;
                rest.fill(0.0);
            }
            [] => {}
        }
        written += 1;
    }
    written
}

pub struct FramePump {
    pending: Vec<StereoSample>,
    position: usize,
}

impl FramePump {
    pub fn new(frame_len: usize) -> Self {
        Self {
            pending: Vec::with_capacity(frame_len),
            position: 0,
        }
    }

    /// Fill all of `out`, pulling new frames from `synth` as needed.
    ///
    /// Pending messages are drained before each pull.
    pub fn fill<R: MessageReceiver>(
        &mut self,
        synth: &mut PolySynth,
        rx: &mut R,
        out: &mut [f32],
        channels: usize,
    ) {
        if channels == 0 {
            return;
        }

        let mut offset = 0;
        while offset < out.len() {
            if self.position == self.pending.len() {
                let frame = synth.pull_frame_from(rx);
                self.pending.clear();
                self.pending.extend_from_slice(frame);
                self.position = 0;
                if self.pending.is_empty() {
                    out[offset..].fill(0.0);
                    return;
                }
            }

            let written = write_interleaved(
                &self.pending[self.position..],
                &mut out[offset..],
                channels,
            );
            if written == 0 {
                // Trailing partial frame in `out`.
                out[offset..].fill(0.0);
                return;
            }
            self.position += written;
            offset += written * channels;
        }
    }

    /// Samples left over from the last pulled frame.
    pub fn pending(&self) -> &[StereoSample] {
        &self.pending[self.position..]
    }
}
