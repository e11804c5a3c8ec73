//! ELEC-MATE voice tool setup
//!
//! The voice agent of ELEC-MATE can call a few hundred tools. Each one has to
//! be entered by hand on the ElevenLabs platform, so this crate keeps the tool
//! registry, tracks which tools are configured, walks the user through them
//! one at a time and exports them in the platform's shape.

pub mod clipboard;
pub mod connect;
pub mod error;
pub mod export;
pub mod notice;
pub mod progress;
pub mod settings;
pub mod tools;
pub mod tui;
pub mod wizard;

pub use error::{ElecMateError, Result};
