use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::search::IndexSelector;
use crate::tui::input::SearchInput;
use crate::tui::theme::Theme;

/// One index tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabItem {
	pub selector: IndexSelector,
	pub label: String,
}

/// Argument bundle for rendering the prompt row.
pub struct InputContext<'a> {
	pub search_input: &'a SearchInput<'a>,
	pub prompt: &'a str,
	pub selected: IndexSelector,
	pub tabs: &'a [TabItem],
	pub area: Rect,
	pub theme: &'a Theme,
}

/// Fetch activity shown at the right edge of the input.
pub struct ProgressState<'a> {
	pub label: &'a str,
	pub busy: bool,
	pub throbber_state: &'a ThrobberState,
}

/// Render the prompt, the query input and the index tabs on one row.
pub fn render_input_with_tabs(frame: &mut Frame, input: InputContext<'_>, progress: ProgressState<'_>) {
	let InputContext {
		search_input,
		prompt,
		selected,
		tabs,
		area,
		theme,
	} = input;

	let tabs_width = calculate_tabs_width(tabs);
	let prompt_width = calculate_prompt_width(prompt);
	let horizontal = Layout::default()
		.direction(Direction::Horizontal)
		.constraints(layout_constraints(prompt_width, tabs_width))
		.split(area);

	if !prompt.is_empty() {
		let prompt_widget = Paragraph::new(format!("{prompt} > ")).style(theme.prompt_style());
		frame.render_widget(prompt_widget, horizontal[0]);
	}

	let input_area = horizontal[1];
	search_input.render_textarea(frame, input_area);
	render_progress(frame, input_area, progress, theme);

	let tabs_area = horizontal[2];
	let tabs_inner = Rect {
		x: tabs_area.x.saturating_add(1),
		width: tabs_area.width.saturating_sub(1),
		..tabs_area
	};
	let selected = selected_tab_index(selected, tabs);
	let titles = build_tab_titles(theme, selected, tabs);
	let widget = Tabs::new(titles)
		.select(selected)
		.divider("")
		.padding("", " ")
		.highlight_style(theme.tab_highlight_style());
	frame.render_widget(widget, tabs_inner);
}

fn calculate_prompt_width(prompt: &str) -> u16 {
	if prompt.is_empty() {
		0
	} else {
		(prompt.chars().count() as u16).saturating_add(3)
	}
}

fn layout_constraints(prompt_width: u16, tabs_width: u16) -> [Constraint; 3] {
	[
		Constraint::Length(prompt_width),
		Constraint::Min(1),
		Constraint::Length(tabs_width),
	]
}

fn selected_tab_index(selected: IndexSelector, tabs: &[TabItem]) -> usize {
	tabs.iter()
		.position(|tab| tab.selector == selected)
		.unwrap_or(0)
}

fn build_tab_titles(theme: &Theme, selected: usize, tabs: &[TabItem]) -> Vec<Line<'static>> {
	let active = theme.header_style();
	let inactive = theme.tab_inactive_style();
	tabs.iter()
		.enumerate()
		.map(|(index, tab)| {
			let style = if index == selected { active } else { inactive };
			Line::from(format!(" {} ", tab.label)).style(style)
		})
		.collect()
}

fn calculate_tabs_width(tabs: &[TabItem]) -> u16 {
	let mut width = 0u16;
	for tab in tabs {
		let label_len = tab.label.chars().count() as u16;
		width = width.saturating_add(label_len.saturating_add(3));
	}
	width.max(12)
}

/// Draw the spinner and label right-aligned inside `area`, never over text
/// already typed into the input.
fn render_progress(frame: &mut Frame, area: Rect, progress: ProgressState<'_>, theme: &Theme) {
	if area.width == 0 || area.height == 0 || progress.label.is_empty() {
		return;
	}

	let muted_style = theme.empty_style();
	let mut line = Line::default();
	if progress.busy {
		let spinner = Throbber::default()
			.style(muted_style)
			.throbber_style(muted_style);
		line.spans.push(spinner.to_symbol_span(progress.throbber_state));
	}
	line.spans
		.push(Span::styled(progress.label.to_string(), muted_style));

	let line_width = line.width() as u16;
	let buffer = frame.buffer_mut();
	let mut start_x = area.right().saturating_sub(line_width).max(area.left());

	let input_row = area.top();
	let mut last_char_x: Option<u16> = None;
	for x in area.left()..area.right() {
		if let Some(cell) = buffer.cell((x, input_row))
			&& !cell.symbol().trim().is_empty()
		{
			last_char_x = Some(x);
		}
	}
	if let Some(last_x) = last_char_x {
		start_x = start_x.max(last_x.saturating_add(3));
	}
	if start_x >= area.right() {
		return;
	}

	let max_width = area.right().saturating_sub(start_x).min(line_width);
	buffer.set_line(start_x, input_row, &line, max_width);
}

#[cfg(test)]
mod tests {
	use ratatui::Terminal;
	use ratatui::backend::TestBackend;

	use super::*;

	fn sample_tabs() -> Vec<TabItem> {
		vec![
			TabItem {
				selector: IndexSelector::All,
				label: "All".into(),
			},
			TabItem {
				selector: IndexSelector::Position(0),
				label: "Galaxies".into(),
			},
			TabItem {
				selector: IndexSelector::Position(1),
				label: "Objects".into(),
			},
		]
	}

	#[test]
	fn prompt_width_accounts_for_separator() {
		assert_eq!(calculate_prompt_width(""), 0);
		assert_eq!(calculate_prompt_width("MISP"), 7);
	}

	#[test]
	fn selected_tab_follows_selector() {
		let tabs = sample_tabs();
		assert_eq!(selected_tab_index(IndexSelector::All, &tabs), 0);
		assert_eq!(selected_tab_index(IndexSelector::Position(1), &tabs), 2);
		assert_eq!(selected_tab_index(IndexSelector::Position(7), &tabs), 0);
	}

	#[test]
	fn tab_titles_use_active_and_inactive_styles() {
		let theme = Theme::default();
		let titles = build_tab_titles(&theme, 1, &sample_tabs());
		assert_eq!(titles[1].spans[0].content.as_ref().trim(), "Galaxies");
		assert_eq!(titles[1].style, theme.header_style());
		assert_eq!(titles[0].style, theme.tab_inactive_style());
	}

	#[test]
	fn rendering_populates_prompt_query_tabs_and_progress() {
		let mut terminal = Terminal::new(TestBackend::new(80, 1)).expect("terminal");
		let input = SearchInput::new("sofacy");
		let tabs = sample_tabs();
		let theme = Theme::default();
		let throbber_state = ThrobberState::default();

		terminal
			.draw(|frame| {
				let context = InputContext {
					search_input: &input,
					prompt: "MISP",
					selected: IndexSelector::Position(0),
					tabs: &tabs,
					area: frame.area(),
					theme: &theme,
				};
				let progress = ProgressState {
					label: "Searching",
					busy: true,
					throbber_state: &throbber_state,
				};
				render_input_with_tabs(frame, context, progress);
			})
			.expect("draw");

		let buffer = terminal.backend().buffer();
		let row: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
		assert!(row.contains("MISP >"));
		assert!(row.contains("sofacy"));
		assert!(row.contains("Galaxies"));
		assert!(row.contains("Searching"));
	}
}
