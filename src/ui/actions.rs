use std::time::Instant;

use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;
use super::outcome::{SearchOutcome, SearchSelection};

impl<'a> App<'a> {
	pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<Option<SearchOutcome>> {
		let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
		if ctrl && key.code == KeyCode::Char('c') {
			return Ok(Some(self.outcome(false)));
		}
		if self.filter_panel.is_some() {
			self.handle_filter_key(key);
			return Ok(None);
		}

		match key.code {
			KeyCode::Esc => return Ok(Some(self.outcome(false))),
			KeyCode::Enter => return Ok(Some(self.outcome(true))),
			KeyCode::Tab => self.set_index(self.indexes.next(self.state.index)),
			KeyCode::BackTab => self.set_index(self.indexes.previous(self.state.index)),
			KeyCode::PageDown => self.next_page(),
			KeyCode::PageUp => self.previous_page(),
			KeyCode::Up => self.move_selection_up(),
			KeyCode::Down => self.move_selection_down(),
			KeyCode::Char('o') if ctrl => self.toggle_expanded(),
			KeyCode::Char('f') if ctrl => self.open_filters(),
			_ => {
				if self.search_input.input(key) {
					self.schedule_search(now);
				}
			}
		}
		Ok(None)
	}

	fn handle_filter_key(&mut self, key: KeyEvent) {
		match key.code {
			KeyCode::Esc => self.close_filters(),
			KeyCode::Enter => self.apply_filters(),
			_ => {
				let Some(panel) = self.filter_panel.as_mut() else {
					return;
				};
				match key.code {
					KeyCode::Up => panel.move_up(),
					KeyCode::Down => panel.move_down(),
					KeyCode::Char(' ') => panel.toggle(),
					KeyCode::Backspace => panel.clear(),
					_ => {}
				}
			}
		}
	}

	fn outcome(&mut self, accepted: bool) -> SearchOutcome {
		self.sync_query();
		self.refresh_link();
		let selection = if accepted { self.current_selection() } else { None };
		SearchOutcome {
			accepted,
			state: self.state.clone(),
			link: self.link.to_string(),
			selection,
		}
	}

	pub(crate) fn current_selection(&self) -> Option<SearchSelection> {
		let index = self.selected?;
		let card = self.view.cards().get(index)?;
		let hit = self.hits.get(index)?;
		Some(SearchSelection::new(card, hit.clone()))
	}

	fn toggle_expanded(&mut self) {
		if let Some(selected) = self.selected
			&& !self.expanded.remove(&selected)
		{
			self.expanded.insert(selected);
		}
	}

	fn move_selection_up(&mut self) {
		if let Some(selected) = self.selected
			&& selected > 0
		{
			self.selected = Some(selected - 1);
		}
	}

	fn move_selection_down(&mut self) {
		if let Some(selected) = self.selected
			&& selected + 1 < self.view.cards().len()
		{
			self.selected = Some(selected + 1);
		}
	}
}
