//! Settings persistence for ELEC-MATE.
//!
//! A small key-value store holds the voice agent credentials, wizard progress
//! and branding choices. The JSONL store keeps one file per profile so several
//! users on one machine never see each other's progress.

pub mod agent;
mod jsonl;
pub mod logo;
mod memory;
mod traits;

pub use agent::VoiceAgentSettings;
pub use jsonl::JsonlSettingsStore;
pub use logo::{LogoSize, LogoUpload};
pub use memory::MemorySettingsStore;
pub use traits::{SettingsStore, get_typed, keys, set_typed};
