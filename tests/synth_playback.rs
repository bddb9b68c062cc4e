use quarterwave::{
    synth::{factory::correction_unit, message::SynthMessage},
    PolySynth, StereoSample, SynthConfig, WaveStyle, SAMPLE_RATE,
};

fn synth(buffer_size: usize) -> PolySynth {
    PolySynth::new(SynthConfig::default().buffer_size(buffer_size)).unwrap()
}

fn is_silent(frame: &[StereoSample]) -> bool {
    frame.iter().all(|s| *s == StereoSample::SILENCE)
}

/// Left-lane samples from `frames` consecutive pulls.
fn record(synth: &mut PolySynth, frames: usize) -> Vec<i16> {
    let mut out = Vec::with_capacity(frames * synth.frame_len());
    for _ in 0..frames {
        out.extend(synth.pull_frame().iter().map(|s| s.left()));
    }
    out
}

#[test]
fn concert_a_sounds_on_the_next_frame() {
    let mut synth = synth(256);
    synth.note_on(69, 100);
    assert!(!is_silent(synth.pull_frame()));
}

#[test]
fn released_note_falls_silent_and_frees_its_voice() {
    let mut synth = synth(256);
    synth.note_on(69, 100);
    let voice = synth.voice_for(69).unwrap();
    synth.pull_frame();

    synth.note_off(69, 100);
    assert!(synth.voice_for(69).is_none());

    let mut frames = 0;
    while !is_silent(synth.pull_frame()) {
        frames += 1;
        assert!(frames < 100, "voice never stopped");
    }
    assert!(synth.pool().is_free(voice));
    assert_eq!(synth.pool().busy_count(), 0);

    // The freed slot is the one handed out next.
    synth.note_on(72, 100);
    assert_eq!(synth.voice_for(72), Some(voice));
}

#[test]
fn note_on_past_full_polyphony_is_dropped() {
    let mut full = synth(128);
    let capacity = full.config().max_polyphony;
    for pitch in 40..40 + capacity as u8 {
        full.note_on(pitch, 100);
    }
    assert_eq!(full.pool().free_count(), 0);

    full.pull_frame();
    let before: Vec<_> = full.pull_frame().to_vec();

    let mut twin = synth(128);
    for pitch in 40..40 + capacity as u8 {
        twin.note_on(pitch, 100);
    }
    twin.note_on(100, 100);
    twin.pull_frame();

    assert!(twin.voice_for(100).is_none());
    assert_eq!(twin.pool().capacity(), capacity);
    assert_eq!(twin.pull_frame(), &before[..]);
}

#[test]
fn note_off_for_an_unheld_pitch_changes_nothing() {
    let mut synth = synth(64);
    synth.note_on(60, 100);
    let busy = synth.pool().busy_count();
    synth.note_off(61, 100);
    synth.note_off(200, 100);
    assert_eq!(synth.pool().busy_count(), busy);
    assert!(synth.voice_for(60).is_some());
}

#[test]
fn out_of_range_pitches_are_accepted_and_ignored() {
    let mut synth = synth(64);
    for pitch in [0, 20, 128, 255] {
        synth.note_on(pitch, 100);
    }
    assert_eq!(synth.pool().busy_count(), 0);
    assert!(is_silent(synth.pull_frame()));
}

#[test]
fn same_pitch_retrigger_overlaps_until_the_old_voice_rings_out() {
    let mut synth = synth(64);
    synth.note_on(45, 100);
    let old = synth.voice_for(45).unwrap();
    synth.pull_frame();

    synth.note_off(45, 100);
    synth.note_on(45, 100);
    let new = synth.voice_for(45).unwrap();
    assert_ne!(old, new);
    assert_eq!(synth.pool().busy_count(), 2);
    assert_eq!(synth.active_voices(), 2);

    for _ in 0..200 {
        synth.pull_frame();
    }
    assert!(synth.pool().is_free(old));
    assert_eq!(synth.active_voices(), 1);
    assert_eq!(synth.voice_for(45), Some(new));
}

#[test]
fn style_change_applies_to_later_notes_only() {
    let mut synth = synth(64);
    synth.note_on(60, 100);
    synth.set_style(WaveStyle::Square);
    synth.note_on(64, 100);

    let first = synth.pool().get(synth.voice_for(60).unwrap());
    let second = synth.pool().get(synth.voice_for(64).unwrap());
    assert_eq!(first.table().unwrap().style(), WaveStyle::Triangle);
    assert_eq!(second.table().unwrap().style(), WaveStyle::Square);
}

#[cfg(feature = "rtrb")]
#[test]
fn ring_buffer_messages_are_drained_before_the_frame() {
    let (mut tx, mut rx) = rtrb::RingBuffer::<SynthMessage>::new(16);
    let mut synth = synth(64);

    tx.push(SynthMessage::SetStyle(WaveStyle::Sine)).unwrap();
    tx.push(SynthMessage::NoteOn {
        note: 69,
        velocity: 100,
    })
    .unwrap();

    assert!(!is_silent(synth.pull_frame_from(&mut rx)));
    assert!(rx.is_empty());
    assert_eq!(synth.style(), WaveStyle::Sine);

    tx.push(SynthMessage::AllNotesOff).unwrap();
    synth.pull_frame_from(&mut rx);
    assert!(synth.voice_for(69).is_none());
}

/// Average distance between rising zero crossings, and how many cycles it spans.
fn average_period(samples: &[i16]) -> (f64, usize) {
    let rising: Vec<usize> = samples
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] < 0 && w[1] >= 0)
        .map(|(i, _)| i + 1)
        .collect();
    let cycles = rising.len() - 1;
    let span = (rising[cycles] - rising[0]) as f64;
    (span / cycles as f64, cycles)
}

#[test]
fn long_run_pitch_matches_the_true_period() {
    // Base-octave pitches whose walk falls short of the half-period.
    for pitch in [21u8, 25, 27] {
        let mut synth = synth(1024);
        let entry = synth.notes().get(pitch).unwrap();
        let period = entry.period();
        let quarter = entry.wave(WaveStyle::Triangle).unwrap().quarter_len();
        let shortfall = period / 2.0 - (2 * quarter) as f64;
        assert!((0.0..1.0).contains(&shortfall));
        assert!(correction_unit(period, quarter) > 0);

        synth.note_on(pitch, 100);
        let cycles = 400;
        let frames = (period * cycles as f64 / 1024.0).ceil() as usize + 2;
        let samples = record(&mut synth, frames);

        let (measured, counted) = average_period(&samples);
        assert!(counted >= cycles - 1);
        assert!(
            (measured - period).abs() < 0.01,
            "pitch {}: measured {} expected {}",
            pitch,
            measured,
            period
        );
    }
}

#[test]
fn uncorrected_walk_would_run_sharp() {
    let mut synth = synth(1024);
    let entry = synth.notes().get(21).unwrap();
    let walked = 4 * entry.wave(WaveStyle::Triangle).unwrap().quarter_len();
    assert!((walked as f64) < entry.period() - 1.0);
    assert_eq!(f64::from(SAMPLE_RATE) / entry.frequency(), entry.period());

    synth.note_on(21, 100);
    let samples = record(&mut synth, 100);
    let (measured, _) = average_period(&samples);
    assert!(measured > walked as f64);
}
