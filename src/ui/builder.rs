use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use super::App;
use super::config::UiConfig;
use super::outcome::SearchOutcome;
use crate::search::{FacetCatalog, HttpSearchClient, IndexCatalog, SearchBackend, SearchState};
use crate::tui::theme::{self, Theme};

/// Configures and runs the interactive search UI.
pub struct SearchUi {
	backend: Arc<dyn SearchBackend>,
	link_base: Url,
	state: Option<SearchState>,
	indexes: IndexCatalog,
	facets: FacetCatalog,
	config: UiConfig,
	theme: Option<Theme>,
}

impl SearchUi {
	pub fn new(backend: Arc<dyn SearchBackend>, link_base: Url) -> Self {
		Self {
			backend,
			link_base,
			state: None,
			indexes: IndexCatalog::default(),
			facets: FacetCatalog::default(),
			config: UiConfig::default(),
			theme: None,
		}
	}

	/// UI backed by the HTTP front-end at `server`; state links point at
	/// the same server.
	pub fn http(server: &Url, timeout: Duration) -> Result<Self> {
		let client = HttpSearchClient::new(server, timeout)
			.with_context(|| format!("failed to create a search client for {server}"))?;
		Ok(Self::new(Arc::new(client), server.clone()))
	}

	pub fn with_state(mut self, state: SearchState) -> Self {
		self.state = Some(state);
		self
	}

	pub fn with_indexes(mut self, indexes: IndexCatalog) -> Self {
		self.indexes = indexes;
		self
	}

	pub fn with_facets(mut self, facets: FacetCatalog) -> Self {
		self.facets = facets;
		self
	}

	pub fn with_config(mut self, config: UiConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = Some(theme);
		self
	}

	/// Select a built-in theme; unknown names keep the default.
	pub fn with_theme_name(mut self, name: &str) -> Self {
		match theme::by_name(name) {
			Some(theme) => self.theme = Some(theme),
			None => tracing::warn!(theme = name, "unknown theme, keeping the default"),
		}
		self
	}

	/// Build the [`App`] without entering the terminal.
	pub fn build<'a>(self) -> Result<App<'a>> {
		let mut app = App::new(self.backend, self.link_base)?;
		app.set_config(self.config);
		app.set_catalogs(self.indexes, self.facets);
		if let Some(theme) = self.theme {
			app.set_theme(theme);
		}
		if let Some(state) = self.state {
			app.set_state(state);
		}
		Ok(app)
	}

	/// Run the interactive search UI with the configured options.
	pub fn run(self) -> Result<SearchOutcome> {
		let mut app = self.build()?;
		app.run()
	}
}
