//! Configuration-driven multi-step form wizard.
//!
//! A `WizardDefinition` lists the steps of a flow; `WizardState` is one
//! user's progress through it. The organization intake and CV intake flows
//! in `flows` are both plain definitions run by the same engine.

pub mod actions;
pub mod definition;
pub mod engine;
pub mod flows;
pub mod handlers;
pub mod list;
pub mod registry;
pub mod state;

pub use registry::WizardRegistry;
