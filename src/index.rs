use crate::keys::KeyToken;
use crate::layout::{Layout, Rule, RuleId};
use fnv::FnvHashMap;
use std::ops::Range;

const NOTE_SLOTS: usize = 128;

/// Note -> rules, stored as one offset table over a flat id list.
///
/// The rules for note `n` live at `rules[starts[n]..starts[n + 1]]`, in layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteIndex {
    starts: Box<[u32]>,
    rules: Box<[RuleId]>,
}

impl NoteIndex {
    /// A note repeated inside one rule lists that rule once.
    /// Notes above 127 are skipped; `Rule::compile` never produces them.
    pub fn build(rules: &[Rule]) -> Self {
        let mut counts = [0u32; NOTE_SLOTS];
        for rule in rules {
            for_each_unique(&rule.notes, |&note| {
                if let Some(c) = counts.get_mut(note as usize) {
                    *c += 1;
                }
            });
        }

        let mut starts = vec![0u32; NOTE_SLOTS + 1];
        for n in 0..NOTE_SLOTS {
            starts[n + 1] = starts[n] + counts[n];
        }

        let mut cursor: Vec<u32> = starts[..NOTE_SLOTS].to_vec();
        let mut flat = vec![RuleId(0); starts[NOTE_SLOTS] as usize];
        for rule in rules {
            for_each_unique(&rule.notes, |&note| {
                if let Some(slot) = cursor.get_mut(note as usize) {
                    flat[*slot as usize] = rule.id;
                    *slot += 1;
                }
            });
        }

        Self {
            starts: starts.into_boxed_slice(),
            rules: flat.into_boxed_slice(),
        }
    }

    /// Rules listening on `note`; empty for unmapped or out-of-range notes.
    pub fn get(&self, note: u8) -> &[RuleId] {
        let n = note as usize;
        if n >= NOTE_SLOTS {
            return &[];
        }
        &self.rules[self.starts[n] as usize..self.starts[n + 1] as usize]
    }

    pub fn contains(&self, note: u8) -> bool {
        !self.get(note).is_empty()
    }

    /// Mapped notes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[RuleId])> + '_ {
        (0..NOTE_SLOTS as u8)
            .map(move |n| (n, self.get(n)))
            .filter(|(_, ids)| !ids.is_empty())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Key token -> rules. Ranges point into one flat id list.
#[derive(Debug, Clone, Default)]
pub struct CharIndex {
    slots: FnvHashMap<KeyToken, Range<u32>>,
    rules: Box<[RuleId]>,
}

impl CharIndex {
    /// A token repeated inside one rule lists that rule once.
    pub fn build(rules: &[Rule]) -> Self {
        let mut order: Vec<KeyToken> = Vec::new();
        let mut grouped: FnvHashMap<KeyToken, Vec<RuleId>> = FnvHashMap::default();
        for rule in rules {
            for_each_unique(&rule.tokens, |token| {
                grouped
                    .entry(*token)
                    .or_insert_with(|| {
                        order.push(*token);
                        Vec::new()
                    })
                    .push(rule.id);
            });
        }

        let mut slots = FnvHashMap::default();
        let mut flat = Vec::new();
        for token in order {
            let ids = grouped.remove(&token).unwrap_or_default();
            let start = flat.len() as u32;
            flat.extend(ids);
            slots.insert(token, start..flat.len() as u32);
        }

        Self {
            slots,
            rules: flat.into_boxed_slice(),
        }
    }

    pub fn get(&self, token: &KeyToken) -> &[RuleId] {
        match self.slots.get(token) {
            Some(r) => &self.rules[r.start as usize..r.end as usize],
            None => &[],
        }
    }

    pub fn contains(&self, token: &KeyToken) -> bool {
        self.slots.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Mapped tokens, sorted so reports are stable.
    pub fn tokens(&self) -> Vec<KeyToken> {
        let mut tokens: Vec<KeyToken> = self.slots.keys().copied().collect();
        tokens.sort();
        tokens
    }
}

impl PartialEq for CharIndex {
    fn eq(&self, other: &Self) -> bool {
        self.slots.len() == other.slots.len()
            && self.slots.keys().all(|t| self.get(t) == other.get(t))
    }
}

/// Every trigger counts once per rule, at its first position. Quadratic in the
/// rule's trigger count, which stays in the single digits for real layouts.
fn for_each_unique<T: PartialEq>(items: &[T], mut f: impl FnMut(&T)) {
    for (i, item) in items.iter().enumerate() {
        if !items[..i].contains(item) {
            f(item);
        }
    }
}

/// The rule arena plus both lookup directions. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledLayout {
    rules: Box<[Rule]>,
    notes: NoteIndex,
    chars: CharIndex,
}

impl CompiledLayout {
    pub fn compile(layout: &Layout) -> Self {
        let rules = layout
            .keymaps
            .iter()
            .enumerate()
            .map(|(i, km)| Rule::compile(RuleId(i as u32), km))
            .collect();
        Self::from_rules(rules)
    }

    /// Ids are reassigned to match arena positions.
    pub fn from_rules(mut rules: Vec<Rule>) -> Self {
        for (i, rule) in rules.iter_mut().enumerate() {
            rule.id = RuleId(i as u32);
        }
        let notes = NoteIndex::build(&rules);
        let chars = CharIndex::build(&rules);
        Self {
            rules: rules.into_boxed_slice(),
            notes,
            chars,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn note_index(&self) -> &NoteIndex {
        &self.notes
    }

    pub fn char_index(&self) -> &CharIndex {
        &self.chars
    }

    pub fn rules_for_note(&self, note: u8) -> impl Iterator<Item = &Rule> + '_ {
        self.notes.get(note).iter().map(move |&id| self.rule(id))
    }

    pub fn rules_for_token(&self, token: &KeyToken) -> impl Iterator<Item = &Rule> + '_ {
        self.chars.get(token).iter().map(move |&id| self.rule(id))
    }
}
