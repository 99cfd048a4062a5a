use crate::condition::{explain, Rejection};
use crate::config::MissPolicy;
use crate::index::CompiledLayout;
use crate::keys::KeyToken;
use crate::layout::RuleId;
use crate::stats::Diagnostics;
use strum_macros::Display;
use tracing::{debug, trace};

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL: u8 = 0xB0;

/// Controller number of the sustain pedal.
pub const SUSTAIN_CC: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum KeyAction {
    Press,
    Release,
}

/// One press or release for the keyboard side to perform, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyIntent {
    pub action: KeyAction,
    pub key: KeyToken,
    pub rule: RuleId,
}

impl KeyIntent {
    pub fn press(key: KeyToken, rule: RuleId) -> Self {
        Self {
            action: KeyAction::Press,
            key,
            rule,
        }
    }

    pub fn release(key: KeyToken, rule: RuleId) -> Self {
        Self {
            action: KeyAction::Release,
            key,
            rule,
        }
    }
}

/// Turns a live note stream into key intents.
///
/// Holds the session's sustain value. Calls must be serialized by the caller.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    sustain: u8,
    policy: MissPolicy,
    stats: Diagnostics,
}

impl Dispatcher {
    pub fn new(policy: MissPolicy) -> Self {
        Self {
            sustain: 0,
            policy,
            stats: Diagnostics::default(),
        }
    }

    pub fn sustain(&self) -> u8 {
        self.sustain
    }

    pub fn stats(&self) -> &Diagnostics {
        &self.stats
    }

    pub fn on_note_event(
        &mut self,
        layout: &CompiledLayout,
        note: u8,
        velocity: u8,
    ) -> Vec<KeyIntent> {
        let mut out = Vec::new();
        self.on_note_event_into(layout, note, velocity, &mut out);
        out
    }

    /// Appends the intents for one note event to `out`.
    ///
    /// Velocity 0 is a note-off: every candidate rule releases its keys whatever its
    /// window says, so a key pressed under different conditions is never left down.
    pub fn on_note_event_into(
        &mut self,
        layout: &CompiledLayout,
        note: u8,
        velocity: u8,
        out: &mut Vec<KeyIntent>,
    ) {
        if !layout.note_index().contains(note) {
            self.stats.unmapped_notes += 1;
            if self.policy == MissPolicy::Log {
                debug!("note {} not found in note map", note);
            }
            return;
        }

        for rule in layout.rules_for_note(note) {
            if velocity == 0 {
                out.extend(rule.tokens.iter().map(|&t| KeyIntent::release(t, rule.id)));
                continue;
            }

            match explain(rule, velocity, self.sustain) {
                None => out.extend(rule.tokens.iter().map(|&t| KeyIntent::press(t, rule.id))),
                Some(reason) => {
                    self.stats.rejected_rules += 1;
                    trace_rejection(rule.id, note, velocity, self.sustain, reason);
                }
            }
        }
    }

    pub fn on_control_change(&mut self, cc_number: u8, value: u8) {
        if cc_number == SUSTAIN_CC {
            self.sustain = value;
        }
    }

    pub fn handle_message(&mut self, layout: &CompiledLayout, message: &[u8]) -> Vec<KeyIntent> {
        let mut out = Vec::new();
        self.handle_message_into(layout, message, &mut out);
        out
    }

    /// Decodes one raw MIDI message. The channel nibble is ignored; only note-on,
    /// note-off and control-change messages do anything.
    pub fn handle_message_into(
        &mut self,
        layout: &CompiledLayout,
        message: &[u8],
        out: &mut Vec<KeyIntent>,
    ) {
        let (status, d1, d2) = match message {
            [status, d1, d2, ..] => (*status, *d1, *d2),
            _ => {
                self.stats.ignored_messages += 1;
                return;
            }
        };

        match status & 0xF0 {
            NOTE_ON => self.on_note_event_into(layout, d1, d2, out),
            NOTE_OFF => self.on_note_event_into(layout, d1, 0, out),
            CONTROL => self.on_control_change(d1, d2),
            _ => self.stats.ignored_messages += 1,
        }
    }
}

fn trace_rejection(rule: RuleId, note: u8, velocity: u8, sustain: u8, reason: Rejection) {
    trace!(
        "rule {} on note {} inactive ({}): velocity={} sustain={}",
        rule,
        note,
        reason,
        velocity,
        sustain
    );
}
