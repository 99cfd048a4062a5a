//! Places synthesized note pairs on a single-track timeline and writes them as a
//! Standard MIDI File with `midly`.

use crate::config::ComposeParams;
use crate::error::{ScResult, ScriabinError};
use crate::synth::{NotePair, RealizedPair};
use fastrand::Rng;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

const U24_MAX: f64 = 16_777_215.0;
const U28_MAX: u32 = 0x0FFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    On { note: u8, velocity: u8 },
    Off { note: u8, velocity: u8 },
}

/// Events spaced evenly: every note-on and every note-off takes one step.
#[derive(Debug, Clone)]
pub struct Timeline {
    events: Vec<NoteEvent>,
    step_ticks: u32,
    tempo_us: u32,
    ticks_per_beat: u16,
    channel: u8,
}

impl Timeline {
    pub fn new(params: &ComposeParams) -> ScResult<Self> {
        if !params.note_length.is_finite() || params.note_length < 0.0 {
            return Err(ScriabinError::Config(format!(
                "note length must be a non-negative number of seconds, got {}",
                params.note_length
            )));
        }
        if !params.tempo_bpm.is_finite() || params.tempo_bpm <= 0.0 {
            return Err(ScriabinError::Config(format!(
                "tempo must be positive, got {}",
                params.tempo_bpm
            )));
        }
        if params.ticks_per_beat == 0 || params.ticks_per_beat > 0x7FFF {
            return Err(ScriabinError::Config(format!(
                "ticks per beat must be in 1..=32767, got {}",
                params.ticks_per_beat
            )));
        }
        if params.channel > 15 {
            return Err(ScriabinError::Config(format!(
                "MIDI channel must be in 0..=15, got {}",
                params.channel
            )));
        }

        let tempo_us = (60_000_000.0 / f64::from(params.tempo_bpm)).round();
        if tempo_us > U24_MAX || tempo_us < 1.0 {
            return Err(ScriabinError::Config(format!(
                "tempo {} bpm cannot be written to a MIDI file",
                params.tempo_bpm
            )));
        }

        let beats = f64::from(params.note_length) * f64::from(params.tempo_bpm) / 60.0;
        let step = (beats * f64::from(params.ticks_per_beat)).round();
        if step > f64::from(U28_MAX) {
            return Err(ScriabinError::Config(format!(
                "note length {}s is too long for a MIDI delta time",
                params.note_length
            )));
        }

        Ok(Self {
            events: Vec::new(),
            step_ticks: step as u32,
            tempo_us: tempo_us as u32,
            ticks_per_beat: params.ticks_per_beat,
            channel: params.channel,
        })
    }

    /// Draws a velocity for every pair and appends on then off.
    pub fn from_pairs(pairs: &[NotePair], params: &ComposeParams, rng: &mut Rng) -> ScResult<Self> {
        let mut timeline = Self::new(params)?;
        for pair in pairs {
            timeline.push_pair(pair.realize(rng));
        }
        debug!(
            "Timeline: {} events, {} ticks apart",
            timeline.events.len(),
            timeline.step_ticks
        );
        Ok(timeline)
    }

    pub fn push_pair(&mut self, pair: RealizedPair) {
        self.events.push(NoteEvent::On {
            note: pair.note,
            velocity: pair.velocity,
        });
        self.events.push(NoteEvent::Off {
            note: pair.note,
            velocity: pair.velocity,
        });
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn step_ticks(&self) -> u32 {
        self.step_ticks
    }

    pub fn to_smf(&self) -> Smf<'static> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(self.ticks_per_beat)),
        ));

        let channel = u4::new(self.channel);
        let mut track: Track<'static> = Vec::with_capacity(self.events.len() + 2);
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(self.tempo_us))),
        });

        for (i, event) in self.events.iter().enumerate() {
            let delta = if i == 0 { 0 } else { self.step_ticks };
            let message = match *event {
                NoteEvent::On { note, velocity } => MidiMessage::NoteOn {
                    key: u7::new(note),
                    vel: u7::new(velocity),
                },
                NoteEvent::Off { note, velocity } => MidiMessage::NoteOff {
                    key: u7::new(note),
                    vel: u7::new(velocity),
                },
            };
            track.push(TrackEvent {
                delta: u28::new(delta),
                kind: TrackEventKind::Midi { channel, message },
            });
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        smf
    }

    pub fn write_to<W: Write>(&self, out: W) -> ScResult<()> {
        self.to_smf().write_std(out)?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ScResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out)?;
        out.flush()?;
        Ok(())
    }
}
