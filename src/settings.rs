use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail, ensure};
use config::{Config, ConfigError, File};
use misp_search::search::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT, url_state};
use misp_search::{FacetCatalog, FacetSpec, IndexCatalog, IndexSelector, SearchState, UiConfig, app_dirs};
use reqwest::Url;
use serde::Deserialize;

use crate::cli::CliArgs;

const ENV_PREFIX: &str = "MISP_SEARCH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
	server: ServerSection,
	search: SearchSection,
	facets: Option<Vec<FacetSpec>>,
	ui: UiSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
	url: Option<String>,
	timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
	page_size: Option<u32>,
	debounce_ms: Option<u64>,
	default_index: Option<String>,
	indexes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiSection {
	theme: Option<String>,
	highlight: Option<bool>,
	initial_query: Option<String>,
}

pub struct ResolvedConfig {
	pub server: Url,
	pub timeout: Duration,
	pub page_size: u32,
	pub debounce: Duration,
	pub indexes: IndexCatalog,
	pub facets: FacetCatalog,
	pub theme: Option<String>,
	pub highlight: bool,
	pub state: SearchState,
}

impl ResolvedConfig {
	pub fn print_summary(&self) {
		println!("Effective configuration:");
		println!("  Server: {}", self.server);
		println!("  Timeout: {}s", self.timeout.as_secs());
		println!("  Page size: {}", self.page_size);
		println!("  Debounce: {}ms", self.debounce.as_millis());
		println!("  Indexes: {}", self.indexes.names().join(", "));
		let facets: Vec<String> = self
			.facets
			.specs()
			.iter()
			.map(|spec| format!("{} ({})", spec.param, spec.field))
			.collect();
		println!("  Facets: {}", facets.join(", "));
		println!(
			"  UI theme: {}",
			self.theme.as_deref().unwrap_or("(use the library default)")
		);
		println!("  Highlight: {}", bool_to_word(self.highlight));
		if !self.state.query.is_empty() {
			println!("  Initial query: {}", self.state.query);
		}
		println!("  Initial index: {}", self.indexes.label_for(self.state.index));
		if self.state.page > 1 {
			println!("  Initial page: {}", self.state.page);
		}
		for (param, values) in &self.state.filters {
			let values: Vec<&str> = values.iter().map(String::as_str).collect();
			println!("  Filter {param}: {}", values.join(", "));
		}
	}

	/// Options for the interactive UI.
	pub fn ui_config(&self) -> UiConfig {
		UiConfig {
			page_size: self.page_size,
			debounce: self.debounce,
			highlight: self.highlight,
			..UiConfig::default()
		}
	}
}

pub fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let builder = build_config(cli)?;
	let mut raw: RawConfig = builder
		.try_deserialize()
		.map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
	raw.apply_cli_overrides(cli);
	let mut resolved = raw.resolve()?;
	apply_state_overrides(&mut resolved, cli)?;
	Ok(resolved)
}

fn build_config(cli: &CliArgs) -> Result<Config> {
	let mut builder = Config::builder();

	if !cli.no_config {
		for path in default_config_files() {
			builder = builder.add_source(File::from(path).required(false));
		}
	}

	for path in &cli.config {
		builder = builder.add_source(File::from(path.clone()).required(true));
	}

	builder = builder.add_source(
		config::Environment::with_prefix(ENV_PREFIX)
			.separator("__")
			.try_parsing(true)
			.list_separator(",")
			.with_list_parse_key("search.indexes"),
	);

	builder.build().map_err(|err| match err {
		ConfigError::Frozen => anyhow!("configuration builder is frozen"),
		other => other.into(),
	})
}

fn default_config_files() -> Vec<PathBuf> {
	let mut files = Vec::new();

	if let Ok(dir) = app_dirs::get_config_dir() {
		files.push(dir.join("config.toml"));
	}

	if let Ok(current_dir) = env::current_dir() {
		files.push(current_dir.join(".misp-search.toml"));
		files.push(current_dir.join("misp-search.toml"));
	}

	files
}

impl RawConfig {
	fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(server) = cli.server.clone() {
			self.server.url = Some(server);
		}
		if let Some(value) = cli.timeout_secs {
			self.server.timeout_secs = Some(value);
		}
		if let Some(value) = cli.page_size {
			self.search.page_size = Some(value);
		}
		if let Some(value) = cli.debounce_ms {
			self.search.debounce_ms = Some(value);
		}
		if let Some(theme) = cli.theme.clone() {
			self.ui.theme = Some(theme);
		}
		if cli.no_highlight {
			self.ui.highlight = Some(false);
		}
	}

	fn resolve(self) -> Result<ResolvedConfig> {
		let raw_url = self
			.server
			.url
			.unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
		let server = Url::parse(raw_url.trim())
			.with_context(|| format!("invalid server URL '{raw_url}'"))?;
		ensure!(
			matches!(server.scheme(), "http" | "https"),
			"server URL must use http or https, got '{}'",
			server.scheme()
		);

		let timeout = self
			.server
			.timeout_secs
			.map_or(DEFAULT_TIMEOUT, Duration::from_secs);
		let page_size = self.search.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
		ensure!(page_size >= 1, "page size must be at least 1");
		let debounce = self
			.search
			.debounce_ms
			.map_or(DEFAULT_DEBOUNCE, Duration::from_millis);

		let indexes = match self.search.indexes {
			Some(names) => {
				let names = sanitize_names(names);
				ensure!(!names.is_empty(), "at least one search index must be configured");
				IndexCatalog::new(names)
			}
			None => IndexCatalog::default(),
		};

		let facets = match self.facets {
			Some(specs) => FacetCatalog::new(validate_facets(specs)?),
			None => FacetCatalog::default(),
		};

		let index = match self.search.default_index.as_deref() {
			Some(value) => parse_default_index(value, &indexes)?,
			None => IndexSelector::default(),
		};
		let query = self.ui.initial_query.unwrap_or_default();

		Ok(ResolvedConfig {
			server,
			timeout,
			page_size,
			debounce,
			state: SearchState::new(query, indexes.normalize(index)),
			indexes,
			facets,
			theme: self.ui.theme,
			highlight: self.ui.highlight.unwrap_or(true),
		})
	}
}

/// `--link` replaces the configured start state; explicit flags win over both.
fn apply_state_overrides(resolved: &mut ResolvedConfig, cli: &CliArgs) -> Result<()> {
	if let Some(link) = &cli.link {
		let url = url_state::parse_link(link, &resolved.server)
			.ok_or_else(|| anyhow!("invalid state link '{link}'"))?;
		resolved.state = url_state::decode(&url, &resolved.facets, resolved.state.index);
	}
	if let Some(query) = &cli.query {
		resolved.state.query = query.clone();
	}
	if let Some(index) = cli.index {
		resolved.state.index = index;
	}
	if let Some(page) = cli.page {
		resolved.state.page = page.max(1);
	}
	resolved.state.index = resolved.indexes.normalize(resolved.state.index);
	Ok(())
}

/// Accepts `all`, a position, or one of the configured index names.
fn parse_default_index(value: &str, indexes: &IndexCatalog) -> Result<IndexSelector> {
	if let Ok(selector) = value.parse::<IndexSelector>() {
		return Ok(selector);
	}
	let trimmed = value.trim();
	match indexes.names().iter().position(|name| name == trimmed) {
		Some(position) => Ok(IndexSelector::Position(position)),
		None => bail!(
			"unknown default index '{trimmed}' (expected \"all\", a position or one of: {})",
			indexes.names().join(", ")
		),
	}
}

fn sanitize_names(names: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut cleaned = Vec::new();
	for name in names {
		let name = name.trim().to_string();
		if name.is_empty() {
			continue;
		}
		if seen.insert(name.clone()) {
			cleaned.push(name);
		}
	}
	cleaned
}

fn validate_facets(specs: Vec<FacetSpec>) -> Result<Vec<FacetSpec>> {
	let mut seen = HashSet::new();
	for spec in &specs {
		ensure!(
			!spec.param.trim().is_empty() && !spec.field.trim().is_empty(),
			"facet entries need both a param and a field"
		);
		ensure!(
			seen.insert(spec.param.clone()),
			"facet parameter '{}' is configured twice",
			spec.param
		);
	}
	Ok(specs)
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}
