pub mod compose;
pub mod inspect;
#[cfg(feature = "midi-io")]
pub mod listen;
pub mod replay;
