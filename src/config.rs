use clap::{Args, ValueEnum};

/// What to do with a note or character that no rule mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MissPolicy {
    /// Only count it.
    Silent,
    /// Count it and emit a debug log line.
    #[default]
    Log,
}

#[derive(Args, Debug, Clone)]
pub struct DiagnosticsParams {
    #[arg(long, value_enum, default_value_t = MissPolicy::Log)]
    pub miss_policy: MissPolicy,
}

impl Default for DiagnosticsParams {
    fn default() -> Self {
        Self {
            miss_policy: MissPolicy::Log,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ComposeParams {
    /// Seconds between consecutive note events
    #[arg(long, default_value_t = 0.1)]
    pub note_length: f32,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, default_value_t = 0)]
    pub channel: u8,
    #[arg(long, default_value_t = 120.0)]
    pub tempo_bpm: f32,
    #[arg(long, default_value_t = 480)]
    pub ticks_per_beat: u16,
}

impl Default for ComposeParams {
    fn default() -> Self {
        Self {
            note_length: 0.1,
            seed: None,
            channel: 0,
            tempo_bpm: 120.0,
            ticks_per_beat: 480,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListenParams {
    /// Connect to the first input port whose name contains this text
    #[arg(long)]
    pub port: Option<String>,
    /// Name of the virtual port opened when no --port is given
    #[arg(long, default_value = "Scriabin")]
    pub virtual_name: String,
}

impl Default for ListenParams {
    fn default() -> Self {
        Self {
            port: None,
            virtual_name: "Scriabin".to_string(),
        }
    }
}
