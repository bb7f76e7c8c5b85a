use ratatui::style::{Color, Modifier, Style};

use super::Theme;

pub const DEFAULT: Theme = Theme {
	header: Style::new()
		.fg(Color::Rgb(226, 232, 240))
		.bg(Color::Rgb(15, 23, 42)),
	row_highlight: Style::new()
		.bg(Color::Rgb(30, 41, 59))
		.fg(Color::Rgb(250, 204, 21)),
	prompt: Style::new().fg(Color::LightCyan),
	empty: Style::new().fg(Color::DarkGray),
	highlight: Style::new()
		.fg(Color::Yellow)
		.add_modifier(Modifier::BOLD),
	link: Style::new()
		.fg(Color::LightBlue)
		.add_modifier(Modifier::UNDERLINED),
	error: Style::new().fg(Color::LightRed),
};

pub const LIGHT: Theme = Theme {
	header: Style::new()
		.fg(Color::Rgb(15, 23, 42))
		.bg(Color::Rgb(226, 232, 240)),
	row_highlight: Style::new()
		.bg(Color::Rgb(200, 200, 200))
		.fg(Color::Rgb(120, 120, 0)),
	prompt: Style::new().fg(Color::Rgb(0, 102, 153)),
	empty: Style::new().fg(Color::Rgb(100, 100, 100)),
	highlight: Style::new()
		.fg(Color::Rgb(120, 120, 0))
		.add_modifier(Modifier::BOLD),
	link: Style::new()
		.fg(Color::Rgb(0, 70, 160))
		.add_modifier(Modifier::UNDERLINED),
	error: Style::new().fg(Color::Rgb(170, 20, 20)),
};

const BUILT_INS: &[(&str, Theme)] = &[("default", DEFAULT), ("light", LIGHT)];

#[must_use]
pub fn default_theme() -> Theme {
	DEFAULT
}

/// Look a theme up by name, ignoring case and surrounding whitespace.
#[must_use]
pub fn by_name(name: &str) -> Option<Theme> {
	let wanted = name.trim();
	BUILT_INS
		.iter()
		.find(|(candidate, _)| candidate.eq_ignore_ascii_case(wanted))
		.map(|(_, theme)| *theme)
}

#[must_use]
pub fn names() -> Vec<&'static str> {
	BUILT_INS.iter().map(|(name, _)| *name).collect()
}
