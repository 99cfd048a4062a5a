use serde::Serialize;

/// Counters for input that produced nothing. None of these are errors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub unmapped_notes: u64,
    pub unmapped_chars: u64,
    pub rejected_rules: u64,
    pub dropped_pairs: u64,
    pub ignored_messages: u64,
}
