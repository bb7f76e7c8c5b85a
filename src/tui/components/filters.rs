use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::search::FilterPanel;
use crate::tui::theme::Theme;

const HINT: &str = "Space toggle · Backspace clear · Enter apply · Esc close";

/// Draw the filter panel as a centred popup over `area`.
pub fn render_filter_panel(frame: &mut Frame, area: Rect, panel: &FilterPanel, theme: &Theme) {
	let popup = centered(area, 60, 70);
	frame.render_widget(Clear, popup);

	let block = Block::default()
		.borders(Borders::ALL)
		.border_style(theme.empty_style())
		.title(Span::styled(" Filters ", theme.header_style()))
		.title_bottom(Span::styled(format!(" {HINT} "), theme.empty_style()));
	let inner = block.inner(popup);
	frame.render_widget(block, popup);

	let (lines, cursor_line) = panel_lines(panel, theme);
	let height = usize::from(inner.height);
	let offset = cursor_line
		.map(|line| (line + 1).saturating_sub(height))
		.unwrap_or(0);
	let offset = u16::try_from(offset).unwrap_or(u16::MAX);
	frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
}

/// Panel rows and the row index of the cursor, if any option exists.
#[must_use]
pub fn panel_lines(panel: &FilterPanel, theme: &Theme) -> (Vec<Line<'static>>, Option<usize>) {
	let mut lines = Vec::new();
	if panel.is_loading() {
		lines.push(Line::from(Span::styled(
			"Loading facet counts…",
			theme.empty_style(),
		)));
		return (lines, None);
	}

	let mut cursor_line = None;
	let mut option_index = 0;
	for group in panel.groups() {
		lines.push(Line::from(Span::styled(
			group.spec.display_label().to_string(),
			theme.header_style(),
		)));
		if group.options.is_empty() {
			lines.push(Line::from(Span::styled("  (no values)", theme.empty_style())));
		}
		for option in &group.options {
			let mark = if option.selected { "[x]" } else { "[ ]" };
			let text = format!("  {mark} {} ({})", option.value, option.count);
			let style = if option_index == panel.cursor() {
				cursor_line = Some(lines.len());
				theme.row_highlight_style()
			} else {
				ratatui::style::Style::default()
			};
			lines.push(Line::from(Span::styled(text, style)));
			option_index += 1;
		}
	}
	(lines, cursor_line)
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
	let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
		.flex(Flex::Center)
		.areas(area);
	let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
		.flex(Flex::Center)
		.areas(row);
	popup
}
