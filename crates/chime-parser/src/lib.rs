//! # chime-parser
//!
//! Turns free-form commands into a time token and a task description.
//!
//! - `normalize`: spoken time phrases to `H[:MM] AM|PM`
//! - `entities`: TIME/DATE span recognition
//! - `tagger`: part-of-speech tagging for task words
//! - `extract`: the utterance parser combining the three

pub mod entities;
pub mod extract;
pub mod normalize;
pub mod tagger;

pub use extract::{extract, Extraction, UtteranceParser};
pub use normalize::normalize;
