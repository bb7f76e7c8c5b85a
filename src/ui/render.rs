use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin};

use super::App;
use crate::tui::components::{
	CardListState, InputContext, ProgressState, StatusContext, TabItem, render_filter_panel,
	render_input_with_tabs, render_results, render_status,
};

const FOOTER_HEIGHT: u16 = 2;

impl<'a> App<'a> {
	pub(crate) fn draw(&mut self, frame: &mut Frame) {
		let area = frame.area().inner(Margin {
			vertical: 0,
			horizontal: 1,
		});

		let layout = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(1),
				Constraint::Length(1),
				Constraint::Min(1),
				Constraint::Length(FOOTER_HEIGHT),
			])
			.split(area);

		let tabs = self.tab_items();
		let progress_text = self.progress_text();
		let input_ctx = InputContext {
			search_input: &self.search_input,
			prompt: &self.config.prompt,
			selected: self.state.index,
			tabs: &tabs,
			area: layout[0],
			theme: &self.theme,
		};
		let progress = ProgressState {
			label: &progress_text,
			busy: self.is_busy(),
			throbber_state: &self.throbber_state,
		};
		render_input_with_tabs(frame, input_ctx, progress);

		render_results(
			frame,
			layout[2],
			&self.view,
			CardListState {
				selected: self.selected,
				expanded: &self.expanded,
			},
			&self.theme,
		);

		let link = self.link.to_string();
		render_status(
			frame,
			layout[3],
			StatusContext {
				pager: self.view.pager(),
				active_filters: self.state.active_filter_count(),
				link: &link,
				theme: &self.theme,
			},
		);

		if let Some(panel) = &self.filter_panel {
			render_filter_panel(frame, area, panel, &self.theme);
		}
	}

	fn tab_items(&self) -> Vec<TabItem> {
		self.indexes
			.selectors()
			.into_iter()
			.map(|selector| TabItem {
				selector,
				label: self.indexes.label_for(selector),
			})
			.collect()
	}

	fn progress_text(&self) -> String {
		if self.is_busy() {
			return "Searching".to_string();
		}
		match self.view.pager() {
			Some(pager) => format!("{} hits", pager.total_hits),
			None => String::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use ratatui::Terminal;
	use ratatui::backend::TestBackend;

	use crate::ui::state::tests::{FakeBackend, app_with, settle};

	fn screen(app: &mut crate::ui::App<'_>, width: u16, height: u16) -> String {
		let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
		terminal.draw(|frame| app.draw(frame)).expect("draw");
		terminal.backend().to_string()
	}

	#[test]
	fn full_screen_shows_tabs_cards_pager_and_link() {
		let mut app = app_with(FakeBackend::new());
		app.request_search();
		settle(&mut app);

		let view = screen(&mut app, 120, 24);
		assert!(view.contains("MISP >"));
		assert!(view.contains("misp-galaxy"));
		assert!(view.contains("[galaxy]  cluster 0"));
		assert!(view.contains("Page 1 of 3 · 23 results"));
		assert!(view.contains("Next"));
		assert!(view.contains("http://localhost:8001/?q=&index=0&page=1"));
	}

	#[test]
	fn filter_popup_overlays_results() {
		let backend = FakeBackend::new();
		let mut app = app_with(Arc::clone(&backend));
		app.open_filters();
		settle(&mut app);

		let view = screen(&mut app, 100, 30);
		assert!(view.contains("Filters"));
		assert!(view.contains("[ ] tlp (5)"));
		assert!(view.contains("[ ] threat-actor (20)"));
	}
}
