//! Export of the voice tool registry for the ElevenLabs agent platform.
//!
//! There is no import path: the output is copied into the platform by hand,
//! either as JSON or as a commented text listing.

mod document;
mod elevenlabs;
mod labels;

pub use document::{ExportDocument, ExportFormat, Exporter};
pub use elevenlabs::{ElevenLabsParameter, ElevenLabsTool, format_tool, render_text};
pub use labels::{FALLBACK_LABEL, TypeLabels};

/// System prompt pasted into the agent alongside the tools
pub const SYSTEM_PROMPT: &str = include_str!("../../data/system_prompt.md");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_embedded() {
        assert!(SYSTEM_PROMPT.starts_with("## IDENTITY"));
        assert!(SYSTEM_PROMPT.contains("ELEC-MATE"));
    }
}
