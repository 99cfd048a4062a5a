use crate::layout::Rule;
use strum_macros::Display;

/// Largest value a 7-bit MIDI data byte can hold.
pub const MIDI_MAX: i32 = 127;

/// Exclusive upper edge of an activation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Bounded(i32),
    Unbounded,
}

impl Bound {
    /// Layout files spell "no upper limit" as any value `<= 0`.
    pub fn from_sentinel(raw: i32) -> Self {
        if raw > 0 {
            Self::Bounded(raw)
        } else {
            Self::Unbounded
        }
    }
}

/// Half-open range `[min, max)` over a 0..=127 performance value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub min: i32,
    pub max: Bound,
}

impl Window {
    pub const ANY: Window = Window {
        min: 0,
        max: Bound::Unbounded,
    };

    pub fn from_raw(min: i32, max: i32) -> Self {
        Self {
            min,
            max: Bound::from_sentinel(max),
        }
    }

    pub fn below_min(&self, value: u8) -> bool {
        i32::from(value) < self.min
    }

    pub fn at_or_above_max(&self, value: u8) -> bool {
        match self.max {
            Bound::Bounded(max) => i32::from(value) >= max,
            Bound::Unbounded => false,
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        !self.below_min(value) && !self.at_or_above_max(value)
    }

    /// True when no MIDI data value (0..=127) falls inside the window.
    pub fn is_empty(&self) -> bool {
        let lo = self.min.max(0);
        let hi = match self.max {
            Bound::Bounded(max) => max.min(MIDI_MAX + 1),
            Bound::Unbounded => MIDI_MAX + 1,
        };
        lo >= hi
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::ANY
    }
}

/// The first clause of the activation check that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    VelocityBelowMin,
    VelocityAtOrAboveMax,
    SustainBelowMin,
    SustainAtOrAboveMax,
}

/// Checks velocity then sustain, reporting the first clause that rejects.
pub fn explain(rule: &Rule, velocity: u8, sustain: u8) -> Option<Rejection> {
    if rule.velocity.below_min(velocity) {
        return Some(Rejection::VelocityBelowMin);
    }
    if rule.velocity.at_or_above_max(velocity) {
        return Some(Rejection::VelocityAtOrAboveMax);
    }
    if rule.sustain.below_min(sustain) {
        return Some(Rejection::SustainBelowMin);
    }
    if rule.sustain.at_or_above_max(sustain) {
        return Some(Rejection::SustainAtOrAboveMax);
    }
    None
}

/// Returns true if the rule is active for this velocity and sustain value.
pub fn satisfies(rule: &Rule, velocity: u8, sustain: u8) -> bool {
    explain(rule, velocity, sustain).is_none()
}
