//! Timed AI interview sessions.

pub mod handlers;
pub mod questions;
pub mod registry;
pub mod session;

pub use registry::InterviewRegistry;
