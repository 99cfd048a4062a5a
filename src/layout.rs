use crate::condition::{Window, MIDI_MAX};
use crate::error::ScResult;
use crate::keys::KeyToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

/// One rule as written in a layout file.
///
/// Numeric fields keep the file convention: a `max_*` value `<= 0` means the
/// window has no upper limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub notes: Vec<i32>,
    pub chars: Vec<String>,
    pub min_velocity: i32,
    pub max_velocity: i32,
    pub min_sustain: i32,
    pub max_sustain: i32,
}

/// The full rule configuration for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub keymaps: Vec<KeyMap>,
}

impl Layout {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ScResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(s: &str) -> ScResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reports questionable rules. Nothing here stops a layout from loading.
    pub fn lint(&self) -> Vec<LintIssue> {
        let mut issues = Vec::new();
        for (idx, km) in self.keymaps.iter().enumerate() {
            let rule = RuleId(idx as u32);
            if km.notes.is_empty() {
                issues.push(LintIssue::new(rule, LintKind::NoNotes));
            }
            if km.chars.is_empty() {
                issues.push(LintIssue::new(rule, LintKind::NoChars));
            }
            for &note in &km.notes {
                if !is_midi_note(note) {
                    issues.push(LintIssue::new(rule, LintKind::NoteOutOfRange(note)));
                }
            }
            for token in &km.chars {
                if token.parse::<KeyToken>().is_err() {
                    issues.push(LintIssue::new(rule, LintKind::UnknownToken(token.clone())));
                }
            }
            if Window::from_raw(km.min_velocity, km.max_velocity).is_empty() {
                issues.push(LintIssue::new(rule, LintKind::EmptyVelocityWindow));
            }
            if Window::from_raw(km.min_sustain, km.max_sustain).is_empty() {
                issues.push(LintIssue::new(rule, LintKind::EmptySustainWindow));
            }
        }
        issues
    }
}

fn is_midi_note(n: i32) -> bool {
    (0..=MIDI_MAX).contains(&n)
}

/// Position of a rule in the layout, used as its identity everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A `KeyMap` after its notes are checked and its tokens resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub notes: Box<[u8]>,
    pub tokens: Box<[KeyToken]>,
    pub velocity: Window,
    pub sustain: Window,
}

impl Rule {
    /// Notes outside 0..=127 and tokens that name no key are dropped with a
    /// warning; the rest of the rule is kept. Repeated notes collapse to the first.
    pub fn compile(id: RuleId, km: &KeyMap) -> Self {
        let mut notes = Vec::with_capacity(km.notes.len());
        for &note in &km.notes {
            match u8::try_from(note) {
                Ok(n) if is_midi_note(note) => {
                    if !notes.contains(&n) {
                        notes.push(n);
                    }
                }
                _ => warn!("Rule {}: note {} is not a MIDI note, skipping it", id, note),
            }
        }

        let mut tokens = Vec::with_capacity(km.chars.len());
        for raw in &km.chars {
            match raw.parse::<KeyToken>() {
                Ok(t) => tokens.push(t),
                Err(e) => warn!("Rule {}: {}. Will replace it with nothing", id, e),
            }
        }

        Self {
            id,
            notes: notes.into_boxed_slice(),
            tokens: tokens.into_boxed_slice(),
            velocity: Window::from_raw(km.min_velocity, km.max_velocity),
            sustain: Window::from_raw(km.min_sustain, km.max_sustain),
        }
    }

    /// A rule without notes or without tokens can never produce anything.
    pub fn is_inert(&self) -> bool {
        self.notes.is_empty() || self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintKind {
    NoNotes,
    NoChars,
    NoteOutOfRange(i32),
    UnknownToken(String),
    EmptyVelocityWindow,
    EmptySustainWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub rule: RuleId,
    pub kind: LintKind,
}

impl LintIssue {
    fn new(rule: RuleId, kind: LintKind) -> Self {
        Self { rule, kind }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LintKind::NoNotes => write!(f, "rule {} has no notes", self.rule),
            LintKind::NoChars => write!(f, "rule {} has no chars", self.rule),
            LintKind::NoteOutOfRange(n) => {
                write!(f, "rule {} lists note {} (outside 0..=127)", self.rule, n)
            }
            LintKind::UnknownToken(t) => write!(f, "rule {} lists unknown key '{}'", self.rule, t),
            LintKind::EmptyVelocityWindow => {
                write!(f, "rule {} can never match: empty velocity window", self.rule)
            }
            LintKind::EmptySustainWindow => {
                write!(f, "rule {} can never match: empty sustain window", self.rule)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Bound;
    use crate::keys::NamedKey;

    #[test]
    fn missing_fields_default_to_zero() {
        let layout = Layout::from_json_str(r#"{"keymaps": [{"notes": [60], "chars": ["a"]}]}"#)
            .unwrap();
        let km = &layout.keymaps[0];
        assert_eq!(km.min_velocity, 0);
        assert_eq!(km.max_sustain, 0);
    }

    #[test]
    fn compile_drops_bad_entries_only() {
        let km = KeyMap {
            notes: vec![60, 200, -1, 61, 60],
            chars: vec!["shift".into(), "nonsense".into(), "a".into()],
            max_velocity: 90,
            ..Default::default()
        };
        let rule = Rule::compile(RuleId(3), &km);
        assert_eq!(&*rule.notes, &[60, 61]);
        assert_eq!(
            &*rule.tokens,
            &[KeyToken::Named(NamedKey::Shift), KeyToken::Literal('a')]
        );
        assert_eq!(rule.velocity.max, Bound::Bounded(90));
        assert_eq!(rule.sustain.max, Bound::Unbounded);
    }

    #[test]
    fn lint_flags_without_rejecting() {
        let layout = Layout {
            name: None,
            keymaps: vec![
                KeyMap {
                    notes: vec![],
                    chars: vec!["a".into()],
                    min_velocity: 50,
                    max_velocity: 50,
                    ..Default::default()
                },
                KeyMap {
                    notes: vec![60],
                    chars: vec!["a".into()],
                    ..Default::default()
                },
            ],
        };
        let issues = layout.lint();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.rule == RuleId(0)));
        assert!(issues.iter().any(|i| i.kind == LintKind::EmptyVelocityWindow));
    }
}
