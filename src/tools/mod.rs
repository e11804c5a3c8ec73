//! Voice tool registry - definitions, YAML loading, queries and list cards

mod card;
mod definition;
mod registry;

pub use card::{CopyField, ToolCard};
pub use definition::{ExecutionMode, ParamType, Tool, ToolParameter};
pub use registry::ToolRegistry;
