use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Keys that have a name instead of a printable character.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NamedKey {
    #[strum(to_string = "escape", serialize = "esc")]
    Escape,
    Tab,
    #[strum(to_string = "super", serialize = "cmd", serialize = "win", serialize = "gui")]
    Super,
    #[strum(to_string = "ctrl", serialize = "control")]
    Ctrl,
    Shift,
    Alt,
    #[strum(to_string = "backspace", serialize = "bksp")]
    Backspace,
    #[strum(to_string = "delete", serialize = "del")]
    Delete,
    #[strum(to_string = "enter", serialize = "return")]
    Enter,
    Left,
    Right,
    Up,
    Down,
}

/// One entry of a rule's `chars`, resolved when the layout is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyToken {
    Named(NamedKey),
    Literal(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken(pub String);

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not understand key '{}'", self.0)
    }
}

impl std::error::Error for UnknownToken {}

impl KeyToken {
    /// Maps a character read from an input text onto the token a layout would use for it.
    /// Control characters with a key of their own become named keys; everything else,
    /// including a plain space, stays literal.
    pub fn from_input_char(c: char) -> Self {
        match c {
            '\n' | '\r' => Self::Named(NamedKey::Enter),
            '\t' => Self::Named(NamedKey::Tab),
            '\x1b' => Self::Named(NamedKey::Escape),
            '\x08' => Self::Named(NamedKey::Backspace),
            '\x7f' => Self::Named(NamedKey::Delete),
            other => Self::Literal(other),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl FromStr for KeyToken {
    type Err = UnknownToken;

    /// Single characters resolve like characters of input text: `"a"` and `"A"`
    /// stay distinct literals, `"\n"` is enter and `"\t"` is tab. Longer strings
    /// must name a key; `"space"` is spelled out for readability but is the
    /// literal `' '`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::from_input_char(c)),
            _ if s.trim().eq_ignore_ascii_case("space") => Ok(Self::Literal(' ')),
            (Some(_), Some(_)) => NamedKey::from_str(s.trim())
                .map(Self::Named)
                .map_err(|_| UnknownToken(s.to_string())),
            (None, _) => Err(UnknownToken(s.to_string())),
        }
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(key) => write!(f, "{}", key),
            Self::Literal(' ') => f.write_str("space"),
            Self::Literal(c) if c.is_control() => write!(f, "{}", c.escape_default()),
            Self::Literal(c) => write!(f, "{}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn named_keys_round_trip_through_display() {
        for key in NamedKey::iter() {
            let parsed: KeyToken = key.to_string().parse().unwrap();
            assert_eq!(parsed, KeyToken::Named(key));
        }
    }

    #[test]
    fn aliases_and_case() {
        assert_eq!("ESC".parse::<KeyToken>(), Ok(KeyToken::Named(NamedKey::Escape)));
        assert_eq!("Return".parse::<KeyToken>(), Ok(KeyToken::Named(NamedKey::Enter)));
        assert_eq!("cmd".parse::<KeyToken>(), Ok(KeyToken::Named(NamedKey::Super)));
    }

    #[test]
    fn single_chars_are_literal() {
        assert_eq!("A".parse::<KeyToken>(), Ok(KeyToken::Literal('A')));
        assert_eq!("é".parse::<KeyToken>(), Ok(KeyToken::Literal('é')));
        assert_eq!("space".parse::<KeyToken>(), Ok(KeyToken::Literal(' ')));
    }

    #[test]
    fn control_chars_match_input_text() {
        for c in ['\n', '\r', '\t', '\x1b', '\x08', '\x7f'] {
            assert_eq!(
                c.to_string().parse::<KeyToken>(),
                Ok(KeyToken::from_input_char(c))
            );
        }
        assert_eq!(KeyToken::Literal('\u{1}').to_string(), "\\u{1}");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("hyper".parse::<KeyToken>().is_err());
        assert!("".parse::<KeyToken>().is_err());
    }
}
