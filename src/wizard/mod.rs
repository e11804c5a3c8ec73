//! Step-by-step voice tool setup wizard.
//!
//! The wizard shows one registry tool at a time. Navigation is a pure
//! reducer (`machine`); the `driver` applies its effects to the progress
//! tracker so every position change is saved as it happens.

mod driver;
mod machine;

pub use driver::Wizard;
pub use machine::{Effect, Transition, WizardAction, WizardState, reduce};
