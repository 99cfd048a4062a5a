pub mod condition;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod keys;
pub mod layout;
#[cfg(feature = "midi-io")]
pub mod midi_in;
pub mod replay;
pub mod sink;
pub mod smf;
pub mod stats;
pub mod synth;
// cmd and reports belong to the binary (main.rs).
