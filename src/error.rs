use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriabinError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MIDI Port Error: {0}")]
    MidiPort(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Unmapped input: {0}")]
    Unmapped(String),
}

pub type ScResult<T> = Result<T, ScriabinError>;

#[cfg(feature = "midi-io")]
impl From<midir::InitError> for ScriabinError {
    fn from(e: midir::InitError) -> Self {
        ScriabinError::MidiPort(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::ConnectError<midir::MidiInput>> for ScriabinError {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        ScriabinError::MidiPort(e.to_string())
    }
}
