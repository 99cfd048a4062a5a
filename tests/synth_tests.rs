mod common;

use common::{compile, keymap, windowed};
use fastrand::Rng;
use scriabin::config::MissPolicy;
use scriabin::layout::RuleId;
use scriabin::synth::{Synthesizer, VelocityRange};

#[test]
fn open_rule_draws_below_127_with_matching_off() {
    let layout = compile(vec![windowed(&[64], &["e"], (0, 0), (0, 0))]);
    let mut synth = Synthesizer::new(MissPolicy::Log);
    let pairs = synth.on_char(&layout, 'e');
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].note, 64);
    assert_eq!(pairs[0].velocity, VelocityRange { lower: 0, upper: 127 });

    let mut rng = Rng::with_seed(42);
    for _ in 0..500 {
        let real = pairs[0].realize(&mut rng);
        assert!(real.velocity < 127);
        assert_eq!(real.note, 64);
    }
}

#[test]
fn pairs_follow_rule_then_note_order() {
    let layout = compile(vec![
        keymap(&[60, 64, 67], &["c"]),
        keymap(&[48], &["x"]),
        keymap(&[36], &["c"]),
    ]);
    let mut synth = Synthesizer::default();
    let notes: Vec<(u8, RuleId)> = synth
        .on_char(&layout, 'c')
        .iter()
        .map(|p| (p.note, p.rule))
        .collect();
    assert_eq!(
        notes,
        vec![(60, RuleId(0)), (64, RuleId(0)), (67, RuleId(0)), (36, RuleId(2))]
    );
}

#[test]
fn bounded_window_sets_the_draw_range() {
    let layout = compile(vec![windowed(&[60], &["a"], (20, 40), (0, 0))]);
    let mut synth = Synthesizer::default();
    let pair = synth.on_char(&layout, 'a')[0];
    assert_eq!(pair.velocity, VelocityRange { lower: 20, upper: 40 });
}

#[test]
fn unmapped_chars_are_dropped() {
    let layout = compile(vec![keymap(&[60], &["a"])]);
    let mut synth = Synthesizer::new(MissPolicy::Silent);
    let pairs = synth.on_text(&layout, "a?a!");
    assert_eq!(pairs.len(), 2);
    assert_eq!(synth.stats().unmapped_chars, 2);
}

#[test]
fn newlines_reach_enter_rules() {
    let layout = compile(vec![keymap(&[50], &["enter"]), keymap(&[53], &["tab"])]);
    let mut synth = Synthesizer::default();
    let pairs = synth.on_text(&layout, "\n\t\r");
    let notes: Vec<u8> = pairs.iter().map(|p| p.note).collect();
    assert_eq!(notes, vec![50, 53, 50]);
}

#[test]
fn unplayable_windows_are_skipped() {
    let layout = compile(vec![
        windowed(&[60], &["a"], (127, 0), (0, 0)),
        windowed(&[62], &["a"], (30, 10), (0, 0)),
        windowed(&[64], &["a"], (0, 0), (0, 0)),
    ]);
    let mut synth = Synthesizer::default();
    let pairs = synth.on_char(&layout, 'a');
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].note, 64);
    assert_eq!(synth.stats().dropped_pairs, 2);
}

#[test]
fn seeded_draws_repeat() {
    let layout = compile(vec![keymap(&[60, 62], &["a"])]);
    let pairs = Synthesizer::default().on_text(&layout, "aaaa");
    let draw = |seed| {
        let mut rng = Rng::with_seed(seed);
        pairs.iter().map(|p| p.realize(&mut rng).velocity).collect::<Vec<_>>()
    };
    assert_eq!(draw(9), draw(9));
}

#[test]
fn raw_control_chars_in_layout_match_text() {
    let layout = compile(vec![keymap(&[50], &["\n"]), keymap(&[51], &["\t"])]);
    let mut synth = Synthesizer::default();
    let pairs = synth.on_text(&layout, "\n\t");
    let notes: Vec<u8> = pairs.iter().map(|p| p.note).collect();
    assert_eq!(notes, vec![50, 51]);
    assert_eq!(synth.stats().unmapped_chars, 0);
}
