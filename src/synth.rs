use crate::condition::{Bound, Window, MIDI_MAX};
use crate::config::MissPolicy;
use crate::index::CompiledLayout;
use crate::keys::KeyToken;
use crate::layout::RuleId;
use crate::stats::Diagnostics;
use fastrand::Rng;
use tracing::{debug, warn};

/// Velocities a synthesized note may take: `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityRange {
    pub lower: u8,
    pub upper: u8,
}

impl VelocityRange {
    /// An unbounded maximum becomes 127, the MIDI ceiling. Bounded maxima above
    /// 128 are cut to 128 so every draw fits in seven bits.
    pub fn from_window(window: &Window) -> Self {
        let lower = window.min.clamp(0, MIDI_MAX + 1);
        let upper = match window.max {
            Bound::Bounded(max) => max.min(MIDI_MAX + 1),
            Bound::Unbounded => MIDI_MAX,
        };
        Self {
            lower: lower as u8,
            upper: upper as u8,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lower >= self.upper
    }

    pub fn contains(&self, velocity: u8) -> bool {
        (self.lower..self.upper).contains(&velocity)
    }

    /// Uniform draw. Callers must skip empty ranges.
    pub fn draw(&self, rng: &mut Rng) -> u8 {
        rng.u8(self.lower..self.upper)
    }
}

/// A note-on/note-off pair waiting for a velocity and a place on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotePair {
    pub note: u8,
    pub velocity: VelocityRange,
    pub rule: RuleId,
}

impl NotePair {
    /// Both halves of the pair carry the same drawn velocity.
    pub fn realize(&self, rng: &mut Rng) -> RealizedPair {
        RealizedPair {
            note: self.note,
            velocity: self.velocity.draw(rng),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealizedPair {
    pub note: u8,
    pub velocity: u8,
}

/// Turns text into note pairs, one character at a time.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    policy: MissPolicy,
    stats: Diagnostics,
}

impl Synthesizer {
    pub fn new(policy: MissPolicy) -> Self {
        Self {
            policy,
            stats: Diagnostics::default(),
        }
    }

    pub fn stats(&self) -> &Diagnostics {
        &self.stats
    }

    pub fn on_char(&mut self, layout: &CompiledLayout, c: char) -> Vec<NotePair> {
        let mut out = Vec::new();
        self.on_token_into(layout, &KeyToken::from_input_char(c), &mut out);
        out
    }

    /// Pairs come out in candidate-rule order, then note order within each rule.
    pub fn on_token_into(
        &mut self,
        layout: &CompiledLayout,
        token: &KeyToken,
        out: &mut Vec<NotePair>,
    ) {
        if !layout.char_index().contains(token) {
            self.stats.unmapped_chars += 1;
            if self.policy == MissPolicy::Log {
                debug!("char {:?} not found in char map", token);
            }
            return;
        }

        for rule in layout.rules_for_token(token) {
            let velocity = VelocityRange::from_window(&rule.velocity);
            if velocity.is_empty() {
                self.stats.dropped_pairs += rule.notes.len() as u64;
                warn!(
                    "rule {} has no playable velocity in [{}, {}), dropping its notes",
                    rule.id, velocity.lower, velocity.upper
                );
                continue;
            }
            out.extend(rule.notes.iter().map(|&note| NotePair {
                note,
                velocity,
                rule: rule.id,
            }));
        }
    }

    pub fn on_text(&mut self, layout: &CompiledLayout, text: &str) -> Vec<NotePair> {
        let mut out = Vec::new();
        for c in text.chars() {
            self.on_token_into(layout, &KeyToken::from_input_char(c), &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_max_draws_below_127() {
        let r = VelocityRange::from_window(&Window::from_raw(0, 0));
        assert_eq!(r, VelocityRange { lower: 0, upper: 127 });
    }

    #[test]
    fn oversized_bounds_are_clamped() {
        let r = VelocityRange::from_window(&Window::from_raw(-20, 300));
        assert_eq!(r, VelocityRange { lower: 0, upper: 128 });
        assert!(VelocityRange::from_window(&Window::from_raw(127, 0)).is_empty());
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = Rng::with_seed(7);
        let r = VelocityRange { lower: 30, upper: 32 };
        for _ in 0..200 {
            assert!(r.contains(r.draw(&mut rng)));
        }
    }
}
