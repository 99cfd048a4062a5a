use criterion::{criterion_group, criterion_main, Criterion};
use scriabin::config::MissPolicy;
use scriabin::dispatch::Dispatcher;
use scriabin::index::CompiledLayout;
use scriabin::layout::{KeyMap, Layout};
use scriabin::synth::Synthesizer;
use std::hint::black_box;

fn setup_layout() -> CompiledLayout {
    let chars = "abcdefghijklmnopqrstuvwxyz";
    let mut keymaps = Vec::new();
    for (i, c) in chars.chars().enumerate() {
        let note = 36 + i as i32;
        keymaps.push(KeyMap {
            notes: vec![note],
            chars: vec![c.to_string()],
            max_velocity: 100,
            max_sustain: 64,
            ..Default::default()
        });
        keymaps.push(KeyMap {
            notes: vec![note],
            chars: vec!["shift".to_string(), c.to_string()],
            min_velocity: 100,
            ..Default::default()
        });
        keymaps.push(KeyMap {
            notes: vec![note, note + 12],
            chars: vec!["ctrl".to_string(), c.to_string()],
            min_sustain: 64,
            ..Default::default()
        });
    }
    CompiledLayout::compile(&Layout {
        name: None,
        keymaps,
    })
}

fn criterion_benchmark(c: &mut Criterion) {
    let layout = setup_layout();
    let messages: Vec<[u8; 3]> = (0..128u8)
        .flat_map(|n| [[0xB0, 0x40, n], [0x90, n, 80], [0x80, n, 0]])
        .collect();

    c.bench_function("dispatch 384 messages", |b| {
        let mut dispatcher = Dispatcher::new(MissPolicy::Silent);
        let mut out = Vec::with_capacity(16);
        b.iter(|| {
            for msg in &messages {
                out.clear();
                dispatcher.handle_message_into(&layout, black_box(msg), &mut out);
                black_box(&out);
            }
        })
    });

    let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
    c.bench_function("synthesize 880 chars", |b| {
        b.iter(|| {
            let mut synth = Synthesizer::new(MissPolicy::Silent);
            black_box(synth.on_text(&layout, black_box(&text)))
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
