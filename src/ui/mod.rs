//! Interactive terminal UI.
//!
//! [`SearchUi`] configures and runs an [`App`]. The remaining submodules hold
//! the event loop, key handling, fetch orchestration and drawing.

mod actions;
mod builder;
mod config;
mod outcome;
mod render;
mod runtime;
mod search;
mod state;

pub use builder::SearchUi;
pub use config::UiConfig;
pub use outcome::{SearchOutcome, SearchSelection};
pub use state::App;
