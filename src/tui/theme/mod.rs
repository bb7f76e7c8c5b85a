mod builtins;

use ratatui::style::{Color, Modifier, Style};

pub use builtins::{DEFAULT, LIGHT, by_name, default_theme, names};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
	pub header: Style,
	pub row_highlight: Style,
	pub prompt: Style,
	pub empty: Style,
	pub highlight: Style,
	pub link: Style,
	pub error: Style,
}

impl Theme {
	#[must_use]
	pub fn header_style(&self) -> Style {
		self.header
	}

	#[must_use]
	pub fn row_highlight_style(&self) -> Style {
		self.row_highlight
	}

	#[must_use]
	pub fn prompt_style(&self) -> Style {
		self.prompt
	}

	#[must_use]
	pub fn empty_style(&self) -> Style {
		self.empty
	}

	#[must_use]
	pub fn highlight_style(&self) -> Style {
		self.highlight
	}

	#[must_use]
	pub fn link_style(&self) -> Style {
		self.link
	}

	#[must_use]
	pub fn error_style(&self) -> Style {
		self.error
	}

	/// Card titles: the prompt colour in bold.
	#[must_use]
	pub fn title_style(&self) -> Style {
		self.prompt.add_modifier(Modifier::BOLD)
	}

	#[must_use]
	pub fn header_fg(&self) -> Color {
		self.header.fg.unwrap_or(Color::Reset)
	}

	#[must_use]
	pub fn header_bg(&self) -> Color {
		self.header.bg.unwrap_or(Color::Reset)
	}

	#[must_use]
	pub fn row_highlight_bg(&self) -> Color {
		self.row_highlight.bg.unwrap_or(Color::Reset)
	}

	#[must_use]
	pub fn tab_inactive_style(&self) -> Style {
		Style::new()
			.fg(self.header_fg())
			.bg(self.row_highlight_bg())
	}

	#[must_use]
	pub fn tab_highlight_style(&self) -> Style {
		Style::new().bg(self.header_bg())
	}
}

impl Default for Theme {
	fn default() -> Self {
		default_theme()
	}
}
