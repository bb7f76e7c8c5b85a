use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Url;
use throbber_widgets_tui::ThrobberState;

use super::config::UiConfig;
use crate::search::{
	Debouncer, FacetCatalog, FilterPanel, Hit, IndexCatalog, SearchBackend, SearchState,
	url_state, worker,
};
use crate::tui::input::SearchInput;
use crate::tui::theme::Theme;
use crate::view::ResultsView;

mod search_runtime;

pub(crate) use search_runtime::SearchRuntime;

impl<'a> Drop for App<'a> {
	fn drop(&mut self) {
		self.results.shutdown();
		self.facet_counts.shutdown();
	}
}

/// Interactive search session.
///
/// All search parameters live in [`App::state`]; the query text being edited
/// is copied into it when the debounce period ends.
pub struct App<'a> {
	pub state: SearchState,
	pub search_input: SearchInput<'a>,
	pub theme: Theme,
	pub(crate) indexes: IndexCatalog,
	pub(crate) facets: FacetCatalog,
	pub(crate) config: UiConfig,
	pub(crate) link_base: Url,
	pub(crate) link: Url,
	pub(crate) throbber_state: ThrobberState,
	pub(crate) debouncer: Debouncer,
	pub(crate) results: SearchRuntime,
	pub(crate) facet_counts: SearchRuntime,
	pub(crate) view: ResultsView,
	/// Hits behind the cards currently on screen, in the same order.
	pub(crate) hits: Vec<Hit>,
	pub(crate) selected: Option<usize>,
	pub(crate) expanded: BTreeSet<usize>,
	pub(crate) filter_panel: Option<FilterPanel>,
}

impl<'a> App<'a> {
	/// Start the fetch workers for `backend`. State links are built on
	/// `link_base`.
	pub fn new(backend: Arc<dyn SearchBackend>, link_base: Url) -> Result<Self> {
		let (results_tx, results_rx, results_latest) =
			worker::spawn(Arc::clone(&backend), "results").context("failed to start the results worker")?;
		let (facets_tx, facets_rx, facets_latest) =
			worker::spawn(backend, "facets").context("failed to start the facets worker")?;

		let state = SearchState::default();
		let facets = FacetCatalog::default();
		let link = url_state::encode(&state, &link_base, &facets);
		let config = UiConfig::default();

		Ok(Self {
			search_input: SearchInput::new(state.query.clone()),
			state,
			theme: Theme::default(),
			indexes: IndexCatalog::default(),
			facets,
			debouncer: Debouncer::new(config.debounce),
			config,
			link_base,
			link,
			throbber_state: ThrobberState::default(),
			results: SearchRuntime::new(results_tx, results_rx, results_latest),
			facet_counts: SearchRuntime::new(facets_tx, facets_rx, facets_latest),
			view: ResultsView::Idle,
			hits: Vec::new(),
			selected: None,
			expanded: BTreeSet::new(),
			filter_panel: None,
		})
	}

	pub fn set_theme(&mut self, theme: Theme) {
		self.theme = theme;
		self.search_input.set_placeholder_style(theme.empty_style());
	}

	pub fn set_config(&mut self, config: UiConfig) {
		self.debouncer = Debouncer::new(config.debounce);
		self.config = config;
	}

	pub fn set_catalogs(&mut self, indexes: IndexCatalog, facets: FacetCatalog) {
		self.indexes = indexes;
		self.facets = facets;
		self.state.index = self.indexes.normalize(self.state.index);
		self.refresh_link();
	}

	/// Replace the whole search state, for example from a state link.
	pub fn set_state(&mut self, mut state: SearchState) {
		state.index = self.indexes.normalize(state.index);
		self.search_input = SearchInput::new(state.query.clone());
		self.search_input
			.set_placeholder_style(self.theme.empty_style());
		self.state = state;
		self.debouncer.cancel();
		self.refresh_link();
	}

	#[must_use]
	pub fn view(&self) -> &ResultsView {
		&self.view
	}

	#[must_use]
	pub fn link(&self) -> &Url {
		&self.link
	}

	pub(crate) fn refresh_link(&mut self) {
		self.link = url_state::encode(&self.state, &self.link_base, &self.facets);
	}

	pub(crate) fn ensure_selection(&mut self) {
		let len = self.view.cards().len();
		self.selected = match self.selected {
			_ if len == 0 => None,
			None => Some(0),
			Some(selected) => Some(selected.min(len - 1)),
		};
	}

	pub(crate) fn is_busy(&self) -> bool {
		self.results.is_in_flight() || self.facet_counts.is_in_flight()
	}
}
