//! # chime-channels
//!
//! Where utterances come from: typed console lines and transcribed audio.

pub mod console;
pub mod whisper;
