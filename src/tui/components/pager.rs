use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;
use crate::view::PagerView;

/// Footer content: pager counters, active filters and the state link.
pub struct StatusContext<'a> {
	pub pager: Option<PagerView>,
	pub active_filters: usize,
	pub link: &'a str,
	pub theme: &'a Theme,
}

/// Draw the two footer rows.
pub fn render_status(frame: &mut Frame, area: Rect, status: StatusContext<'_>) {
	let lines = vec![
		pager_line(status.pager, status.active_filters, status.theme),
		Line::from(Span::styled(status.link.to_string(), status.theme.link_style())),
	];
	frame.render_widget(Paragraph::new(lines), area);
}

/// Counters with Previous/Next controls shown only when they apply.
#[must_use]
pub fn pager_line(pager: Option<PagerView>, active_filters: usize, theme: &Theme) -> Line<'static> {
	let muted = theme.empty_style();
	let mut spans = Vec::new();
	if let Some(pager) = pager {
		if pager.has_previous {
			spans.push(Span::styled("‹ Prev (PgUp)  ", theme.prompt_style()));
		}
		let noun = if pager.total_hits == 1 { "result" } else { "results" };
		spans.push(Span::raw(format!(
			"Page {} of {} · {} {noun}",
			pager.page, pager.total_pages, pager.total_hits
		)));
		if pager.has_next {
			spans.push(Span::styled("  Next › (PgDn)", theme.prompt_style()));
		}
	}
	if active_filters > 0 {
		spans.push(Span::styled(
			format!("  [{active_filters} filter(s), Ctrl-F]"),
			theme.highlight_style(),
		));
	} else {
		spans.push(Span::styled("  Ctrl-F filters", muted));
	}
	Line::from(spans)
}
