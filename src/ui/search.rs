use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use super::App;
use crate::search::worker::FetchResult;
use crate::search::{FacetDistribution, FilterPanel, IndexSelector, SearchRequest};
use crate::view::{ResultsView, ViewOptions, build_results, visible_hits};

impl<'a> App<'a> {
	/// Fetch results for the current state right away.
	pub(crate) fn request_search(&mut self) {
		self.debouncer.cancel();
		self.refresh_link();
		if !matches!(self.view, ResultsView::Cards { .. }) {
			self.view = ResultsView::Loading;
		}
		let request = SearchRequest::from_state(&self.state, self.config.page_size, &self.facets);
		let id = self.results.issue(request);
		tracing::debug!(id, query = %self.state.query, index = %self.state.index, page = self.state.page, "search issued");
	}

	/// Restart the debounce period after a keystroke.
	pub(crate) fn schedule_search(&mut self, now: Instant) {
		self.debouncer.schedule(now);
	}

	/// Issue the pending search once the debounce period has elapsed.
	pub(crate) fn pump_debounce(&mut self, now: Instant) {
		if self.debouncer.poll(now) && self.sync_query() {
			self.request_search();
		}
	}

	/// Copy the edited query into the state. Returns whether it changed.
	pub(crate) fn sync_query(&mut self) -> bool {
		self.debouncer.cancel();
		let query = self.search_input.text().to_string();
		self.state.set_query(&query)
	}

	pub(crate) fn set_index(&mut self, index: IndexSelector) {
		let query_changed = self.sync_query();
		let index_changed = self.state.set_index(self.indexes.normalize(index));
		if query_changed || index_changed {
			self.request_search();
		}
	}

	pub(crate) fn next_page(&mut self) {
		let has_next = self.view.pager().is_some_and(|pager| pager.has_next);
		if self.sync_query() {
			self.request_search();
		} else if has_next {
			self.state.next_page();
			self.request_search();
		}
	}

	pub(crate) fn previous_page(&mut self) {
		if self.sync_query() || self.state.previous_page() {
			self.request_search();
		}
	}

	/// Open the filter popup and fetch facet counts for the current query.
	/// A query still waiting on the debounce is searched right away.
	pub(crate) fn open_filters(&mut self) {
		if self.sync_query() {
			self.request_search();
		}
		self.filter_panel = Some(FilterPanel::loading(&self.facets, &self.state.filters));
		let request = SearchRequest::facet_request(&self.state, &self.facets);
		self.facet_counts.issue(request);
	}

	/// Close the popup and search with its selection.
	pub(crate) fn apply_filters(&mut self) {
		let Some(panel) = self.filter_panel.take() else {
			return;
		};
		if self.state.set_filters(panel.selection()) {
			self.request_search();
		}
	}

	pub(crate) fn close_filters(&mut self) {
		self.filter_panel = None;
	}

	/// Drain results, applying only the one for the latest request.
	pub(crate) fn pump_search_results(&mut self) {
		loop {
			match self.results.try_recv() {
				Ok(result) => self.handle_search_result(result),
				Err(TryRecvError::Empty) => break,
				Err(TryRecvError::Disconnected) => {
					self.results.record_completion();
					break;
				}
			}
		}
	}

	fn handle_search_result(&mut self, result: FetchResult) {
		if !self.results.matches_latest(result.id) {
			tracing::trace!(id = result.id, "ignoring stale search result");
			return;
		}
		self.results.record_completion();

		// Render against the parameters the result answers.
		let state = result.request.state();
		let options = ViewOptions {
			page_size: result.request.page_size,
			..self.config.view_options()
		};
		self.view = build_results(result.outcome.as_ref(), &state, &self.indexes, options);
		self.hits = match &result.outcome {
			Ok(response) => visible_hits(response, &state, options.page_size)
				.into_iter()
				.cloned()
				.collect(),
			Err(_) => Vec::new(),
		};
		self.expanded.clear();
		self.selected = None;
		self.ensure_selection();
	}

	pub(crate) fn pump_facet_results(&mut self) {
		loop {
			match self.facet_counts.try_recv() {
				Ok(result) => self.handle_facet_result(result),
				Err(TryRecvError::Empty) => break,
				Err(TryRecvError::Disconnected) => {
					self.facet_counts.record_completion();
					break;
				}
			}
		}
	}

	fn handle_facet_result(&mut self, result: FetchResult) {
		if !self.facet_counts.matches_latest(result.id) {
			return;
		}
		self.facet_counts.record_completion();
		let Some(panel) = self.filter_panel.as_mut() else {
			return;
		};
		match &result.outcome {
			Ok(response) => panel.populate(&self.facets, &response.facet_distribution),
			Err(_) => panel.populate(&self.facets, &FacetDistribution::new()),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::time::Duration;

	use super::*;
	use crate::ui::state::tests::{FakeBackend, app_with, settle};

	#[test]
	fn rapid_edits_issue_one_fetch() {
		let backend = FakeBackend::new();
		let mut app = app_with(Arc::clone(&backend));
		let start = Instant::now();
		let delay = app.config.debounce;

		for (offset, text) in ["a", "ap", "apt"].into_iter().enumerate() {
			app.search_input = crate::tui::input::SearchInput::new(text);
			app.schedule_search(start + Duration::from_millis(offset as u64 * 50));
			app.pump_debounce(start + Duration::from_millis(offset as u64 * 50 + 10));
		}
		assert!(backend.requests().is_empty());

		app.pump_debounce(start + Duration::from_millis(100) + delay);
		settle(&mut app);

		let requests = backend.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].query, "apt");
		assert_eq!(app.view().cards()[0].title.plain_text(), "apt cluster 0");
	}

	#[test]
	fn opening_filters_mid_debounce_searches_the_typed_query() {
		let backend = FakeBackend::new();
		let mut app = app_with(Arc::clone(&backend));
		let start = Instant::now();
		app.request_search();
		settle(&mut app);

		app.search_input = crate::tui::input::SearchInput::new("apt");
		app.schedule_search(start);
		app.open_filters();
		settle(&mut app);
		app.close_filters();
		app.pump_debounce(start + Duration::from_secs(5));
		settle(&mut app);

		let queries: Vec<String> = backend
			.requests()
			.into_iter()
			.filter(|request| request.facets.is_empty())
			.map(|request| request.query)
			.collect();
		assert_eq!(queries, ["", "apt"]);
		assert_eq!(app.view().cards()[0].title.plain_text(), "apt cluster 0");
		assert!(app.link().as_str().contains("q=apt"));
	}

	#[test]
	fn results_render_with_the_query_they_answer() {
		let mut app = app_with(FakeBackend::new());
		app.request_search();
		app.search_input = crate::tui::input::SearchInput::new("cluster");
		app.sync_query();
		settle(&mut app);

		let title = &app.view().cards()[0].title;
		assert_eq!(title.plain_text(), " cluster 0");
		assert_eq!(title.to_marked(), " cluster 0");
	}

	#[test]
	fn paging_follows_the_pager() {
		let backend = FakeBackend::new();
		let mut app = app_with(Arc::clone(&backend));
		app.request_search();
		settle(&mut app);

		app.previous_page();
		assert_eq!(app.state.page, 1);

		app.next_page();
		settle(&mut app);
		assert_eq!(app.state.page, 2);
		assert!(app.link().as_str().contains("page=2"));

		app.set_index(IndexSelector::All);
		settle(&mut app);
		assert_eq!(app.state.page, 1);

		let pages: Vec<u32> = backend.requests().iter().map(|request| request.page).collect();
		assert_eq!(pages, [1, 2, 1]);
	}

	#[test]
	fn filters_round_trip_through_the_panel() {
		let backend = FakeBackend::new();
		let mut app = app_with(Arc::clone(&backend));

		app.open_filters();
		settle(&mut app);
		let panel = app.filter_panel.as_mut().expect("panel open");
		assert!(!panel.is_loading());
		panel.toggle();
		app.apply_filters();
		settle(&mut app);

		assert!(app.filter_panel.is_none());
		assert_eq!(
			app.state.filters_for("taxonomies").map(|values| values.len()),
			Some(1)
		);
		let requests = backend.requests();
		assert!(!requests[0].facets.is_empty());
		assert!(requests[0].filters.is_empty());
		assert_eq!(requests.last().map(|request| request.filters.len()), Some(1));
	}
}
