use std::collections::BTreeSet;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::tui::theme::Theme;
use crate::view::{CardView, ResultsView, RichText, TableView, ValueView};

const INDENT: &str = "  ";
const SELECTED_MARKER: &str = "▌ ";

/// Selection and expansion state for the card list.
#[derive(Debug, Clone, Copy)]
pub struct CardListState<'a> {
	pub selected: Option<usize>,
	pub expanded: &'a BTreeSet<usize>,
}

/// Draw the results area: either the card list or a centred status message.
pub fn render_results(
	frame: &mut Frame,
	area: Rect,
	view: &ResultsView,
	state: CardListState<'_>,
	theme: &Theme,
) {
	if let Some(message) = view.message() {
		let style = match view {
			ResultsView::Error => theme.error_style(),
			_ => theme.empty_style(),
		};
		let paragraph = Paragraph::new(message)
			.alignment(Alignment::Center)
			.style(style);
		frame.render_widget(paragraph, area);
		return;
	}

	let mut lines = Vec::new();
	let mut selected_span = None;
	for (index, card) in view.cards().iter().enumerate() {
		let is_selected = state.selected == Some(index);
		let start = lines.len();
		lines.extend(card_lines(
			card,
			is_selected,
			state.expanded.contains(&index),
			area.width,
			theme,
		));
		if is_selected {
			selected_span = Some((start, lines.len()));
		}
		lines.push(Line::default());
	}

	let offset = scroll_offset(selected_span, area.height);
	let paragraph = Paragraph::new(lines).scroll((offset, 0));
	frame.render_widget(paragraph, area);
}

/// First visible line so that the selected card is on screen, preferring to
/// show its top when it is taller than the area.
fn scroll_offset(selected: Option<(usize, usize)>, height: u16) -> u16 {
	let Some((start, end)) = selected else {
		return 0;
	};
	let height = usize::from(height);
	let offset = end.saturating_sub(height).min(start);
	u16::try_from(offset).unwrap_or(u16::MAX)
}

/// Lines for one card, wrapped to `width`.
#[must_use]
pub fn card_lines(
	card: &CardView,
	selected: bool,
	expanded: bool,
	width: u16,
	theme: &Theme,
) -> Vec<Line<'static>> {
	let width = usize::from(width);
	let mut lines = Vec::new();

	let marker = if selected {
		Span::styled(SELECTED_MARKER, theme.row_highlight_style())
	} else {
		Span::raw(INDENT)
	};
	let kind = Span::styled(format!("[{}] ", card.kind.label()), theme.empty_style());
	let title_width = width
		.saturating_sub(SELECTED_MARKER.chars().count())
		.saturating_sub(kind.width());
	let mut title_rows = wrap_rich(&card.title, theme.title_style(), theme, title_width).into_iter();
	if let Some(first) = title_rows.next() {
		let mut spans = vec![marker, kind];
		spans.extend(first);
		lines.push(Line::from(spans));
	}
	for row in title_rows {
		lines.push(indented(1, row));
	}

	if let Some(link) = &card.link {
		lines.push(indented(
			1,
			vec![Span::styled(link.href.clone(), theme.link_style())],
		));
	}

	let body_width = width.saturating_sub(INDENT.len());
	for row in wrap_rich(&card.description, Style::default(), theme, body_width) {
		lines.push(indented(1, row));
	}

	if card.details.is_empty() {
		return lines;
	}
	if expanded {
		table_lines(&card.details, 1, width, theme, &mut lines);
	} else {
		let count = card.details.rows.len();
		let noun = if count == 1 { "field" } else { "fields" };
		lines.push(indented(
			1,
			vec![Span::styled(
				format!("▸ {count} more {noun} (Ctrl-O)"),
				theme.empty_style(),
			)],
		));
	}
	lines
}

fn table_lines(table: &TableView, depth: usize, width: usize, theme: &Theme, out: &mut Vec<Line<'static>>) {
	for row in &table.rows {
		let key = Span::styled(format!("{}: ", row.key), theme.prompt_style());
		match &row.value {
			ValueView::Text(text) => {
				let available = width
					.saturating_sub(INDENT.len() * depth)
					.saturating_sub(key.width());
				let mut rows = wrap_rich(text, Style::default(), theme, available).into_iter();
				let mut first = vec![key];
				first.extend(rows.next().unwrap_or_default());
				out.push(indented(depth, first));
				for rest in rows {
					out.push(indented(depth + 1, rest));
				}
			}
			ValueView::List(items) => {
				out.push(indented(depth, vec![key]));
				list_lines(items, depth + 1, width, theme, out);
			}
			ValueView::Table(nested) => {
				out.push(indented(depth, vec![key]));
				table_lines(nested, depth + 1, width, theme, out);
			}
		}
	}
}

fn list_lines(items: &[ValueView], depth: usize, width: usize, theme: &Theme, out: &mut Vec<Line<'static>>) {
	for item in items {
		let bullet = Span::styled("- ", theme.empty_style());
		match item {
			ValueView::Text(text) => {
				let available = width.saturating_sub(INDENT.len() * depth + 2);
				let mut rows = wrap_rich(text, Style::default(), theme, available).into_iter();
				let mut first = vec![bullet];
				first.extend(rows.next().unwrap_or_default());
				out.push(indented(depth, first));
				for rest in rows {
					out.push(indented(depth + 1, rest));
				}
			}
			ValueView::List(nested) => {
				out.push(indented(depth, vec![bullet]));
				list_lines(nested, depth + 1, width, theme, out);
			}
			ValueView::Table(nested) => {
				out.push(indented(depth, vec![bullet]));
				table_lines(nested, depth + 1, width, theme, out);
			}
		}
	}
}

fn indented(depth: usize, spans: Vec<Span<'static>>) -> Line<'static> {
	let mut all = Vec::with_capacity(spans.len() + 1);
	all.push(Span::raw(INDENT.repeat(depth)));
	all.extend(spans);
	Line::from(all)
}

/// Break rich text into rows no wider than `width` columns, keeping the
/// highlight of every segment. Embedded newlines start a new row.
fn wrap_rich(text: &RichText, base: Style, theme: &Theme, width: usize) -> Vec<Vec<Span<'static>>> {
	let width = width.max(1);
	let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
	let mut used = 0;

	for segment in text.segments() {
		let style = if segment.highlighted {
			theme.highlight_style()
		} else {
			base
		};
		let mut current = String::new();
		for ch in segment.text.chars() {
			if ch == '\n' {
				flush(&mut rows, &mut current, style);
				rows.push(Vec::new());
				used = 0;
				continue;
			}
			let ch_width = ch.width().unwrap_or(0);
			if used + ch_width > width && used > 0 {
				flush(&mut rows, &mut current, style);
				rows.push(Vec::new());
				used = 0;
			}
			current.push(ch);
			used += ch_width;
		}
		flush(&mut rows, &mut current, style);
	}
	rows
}

fn flush(rows: &mut [Vec<Span<'static>>], current: &mut String, style: Style) {
	if current.is_empty() {
		return;
	}
	if let Some(row) = rows.last_mut() {
		row.push(Span::styled(std::mem::take(current), style));
	}
}
