#![allow(dead_code)]

use scriabin::index::CompiledLayout;
use scriabin::layout::{KeyMap, Layout};

pub fn keymap(notes: &[i32], chars: &[&str]) -> KeyMap {
    KeyMap {
        notes: notes.to_vec(),
        chars: chars.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

pub fn windowed(
    notes: &[i32],
    chars: &[&str],
    velocity: (i32, i32),
    sustain: (i32, i32),
) -> KeyMap {
    KeyMap {
        min_velocity: velocity.0,
        max_velocity: velocity.1,
        min_sustain: sustain.0,
        max_sustain: sustain.1,
        ..keymap(notes, chars)
    }
}

pub fn compile(keymaps: Vec<KeyMap>) -> CompiledLayout {
    CompiledLayout::compile(&Layout {
        name: None,
        keymaps,
    })
}
