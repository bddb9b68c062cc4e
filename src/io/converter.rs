use crate::{dsp::wavetable::WaveStyle, io::midi::MidiEvent, synth::message::SynthMessage};

/// Controller number of the "All Notes Off" channel-mode message.
pub const ALL_NOTES_OFF: u8 = 123;

/// Map a decoded MIDI event on `channel_filter` to a synth message.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    if midi.channel() != channel_filter {
        return None;
    }

    match midi {
        // Running-status senders use a zero-velocity note-on as note-off.
        MidiEvent::NoteOn {
            key, velocity: 0, ..
        } => Some(SynthMessage::NoteOff {
            note: key,
            velocity: 0,
        }),
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, velocity, .. } => Some(SynthMessage::NoteOff {
            note: key,
            velocity,
        }),
        MidiEvent::ProgramChange { program, .. } => program_style(program).map(SynthMessage::SetStyle),
        MidiEvent::ControlChange {
            controller: ALL_NOTES_OFF,
            ..
        } => Some(SynthMessage::AllNotesOff),
        _ => None,
    }
}

/// General MIDI program numbers that pick a waveform: piano, organ and
/// synth lead.
pub fn program_style(program: u8) -> Option<WaveStyle> {
    match program {
        0 => Some(WaveStyle::Sine),
        18 => Some(WaveStyle::Triangle),
        36 => Some(WaveStyle::Square),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_pass_through_on_the_selected_channel() {
        let on = MidiEvent::NoteOn {
            channel: 0,
            key: 69,
            velocity: 100,
        };
        assert_eq!(
            midi_to_synth(on, 0),
            Some(SynthMessage::NoteOn {
                note: 69,
                velocity: 100
            })
        );
        assert_eq!(midi_to_synth(on, 1), None);
    }

    #[test]
    fn zero_velocity_note_on_is_a_note_off() {
        let on = MidiEvent::NoteOn {
            channel: 2,
            key: 60,
            velocity: 0,
        };
        assert_eq!(
            midi_to_synth(on, 2),
            Some(SynthMessage::NoteOff {
                note: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn program_changes_select_styles() {
        let pc = |program| MidiEvent::ProgramChange {
            channel: 0,
            program,
        };
        assert_eq!(midi_to_synth(pc(0), 0), Some(SynthMessage::SetStyle(WaveStyle::Sine)));
        assert_eq!(midi_to_synth(pc(18), 0), Some(SynthMessage::SetStyle(WaveStyle::Triangle)));
        assert_eq!(midi_to_synth(pc(36), 0), Some(SynthMessage::SetStyle(WaveStyle::Square)));
        assert_eq!(midi_to_synth(pc(5), 0), None);
    }

    #[test]
    fn controllers_other_than_all_notes_off_are_dropped() {
        let cc = |controller| MidiEvent::ControlChange {
            channel: 0,
            controller,
            value: 0,
        };
        assert_eq!(midi_to_synth(cc(ALL_NOTES_OFF), 0), Some(SynthMessage::AllNotesOff));
        assert_eq!(midi_to_synth(cc(7), 0), None);
        assert_eq!(
            midi_to_synth(
                MidiEvent::PitchBend {
                    channel: 0,
                    value: 100
                },
                0
            ),
            None
        );
    }
}
