use std::time::Duration;

use crate::search::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE};
use crate::view::ViewOptions;

pub const DEFAULT_PROMPT: &str = "MISP";

/// Behavioural switches for the interactive UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
	pub page_size: u32,
	pub debounce: Duration,
	pub highlight: bool,
	pub prompt: String,
}

impl Default for UiConfig {
	fn default() -> Self {
		Self {
			page_size: DEFAULT_PAGE_SIZE,
			debounce: DEFAULT_DEBOUNCE,
			highlight: true,
			prompt: DEFAULT_PROMPT.to_string(),
		}
	}
}

impl UiConfig {
	#[must_use]
	pub fn view_options(&self) -> ViewOptions {
		ViewOptions {
			page_size: self.page_size,
			highlight: self.highlight,
		}
	}
}
