//! Framework-independent screen models. Front-ends render these and feed
//! user input back as intents.

pub mod state;
pub mod vm;

pub use state::{ViewError, ViewState};
