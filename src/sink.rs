use crate::dispatch::{KeyAction, KeyIntent};
use crate::error::ScResult;
use crate::keys::KeyToken;
use std::io::Write;
use tracing::warn;

/// Whatever performs the key presses: an input simulator, a pipe, a test recorder.
pub trait KeySink {
    fn press(&mut self, key: &KeyToken) -> ScResult<()>;
    fn release(&mut self, key: &KeyToken) -> ScResult<()>;
}

/// Writes one `press <key>` / `release <key>` line per intent, for piping
/// into an input tool such as `xdotool` or `ydotool`.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, action: KeyAction, key: &KeyToken) -> ScResult<()> {
        writeln!(self.out, "{} {}", action, key)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> KeySink for ConsoleSink<W> {
    fn press(&mut self, key: &KeyToken) -> ScResult<()> {
        self.emit(KeyAction::Press, key)
    }

    fn release(&mut self, key: &KeyToken) -> ScResult<()> {
        self.emit(KeyAction::Release, key)
    }
}

/// Hands intents to the sink in order. A failing intent is logged and skipped
/// so the rest still go out. Returns how many were delivered.
pub fn deliver<S: KeySink + ?Sized>(sink: &mut S, intents: &[KeyIntent]) -> usize {
    let mut delivered = 0;
    for intent in intents {
        let res = match intent.action {
            KeyAction::Press => sink.press(&intent.key),
            KeyAction::Release => sink.release(&intent.key),
        };
        match res {
            Ok(()) => delivered += 1,
            Err(e) => warn!("Could not {} key {}: {}", intent.action, intent.key, e),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScriabinError;
    use crate::keys::NamedKey;
    use crate::layout::RuleId;

    struct Picky {
        seen: Vec<String>,
    }

    impl KeySink for Picky {
        fn press(&mut self, key: &KeyToken) -> ScResult<()> {
            if key.is_named() {
                return Err(ScriabinError::Unmapped("no named keys here".into()));
            }
            self.seen.push(format!("+{}", key));
            Ok(())
        }

        fn release(&mut self, key: &KeyToken) -> ScResult<()> {
            self.seen.push(format!("-{}", key));
            Ok(())
        }
    }

    #[test]
    fn console_lines() {
        let mut sink = ConsoleSink::new(Vec::new());
        let intents = [
            KeyIntent::press(KeyToken::Named(NamedKey::Shift), RuleId(0)),
            KeyIntent::release(KeyToken::Literal(' '), RuleId(0)),
        ];
        assert_eq!(deliver(&mut sink, &intents), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "press shift\nrelease space\n");
    }

    #[test]
    fn layout_newline_prints_as_enter() {
        let mut sink = ConsoleSink::new(Vec::new());
        let key: KeyToken = "\n".parse().unwrap();
        let intents = [
            KeyIntent::press(key, RuleId(0)),
            KeyIntent::release(KeyToken::Literal('\u{7}'), RuleId(0)),
        ];
        assert_eq!(deliver(&mut sink, &intents), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "press enter\nrelease \\u{7}\n");
    }

    #[test]
    fn one_bad_key_does_not_stop_the_rest() {
        let mut sink = Picky { seen: vec![] };
        let intents = [
            KeyIntent::press(KeyToken::Named(NamedKey::Shift), RuleId(0)),
            KeyIntent::press(KeyToken::Literal('A'), RuleId(0)),
        ];
        assert_eq!(deliver(&mut sink, &intents), 1);
        assert_eq!(sink.seen, vec!["+A"]);
    }
}
