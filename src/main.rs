mod cli;
mod settings;

use anyhow::{Context, Result};
use cli::{CliArgs, parse_cli, print_outcome, print_results};
use misp_search::logging::{self, LogTarget};
use misp_search::search::url_state;
use misp_search::{
	HttpSearchClient, SearchBackend, SearchRequest, SearchUi, build_results, tui::theme,
};
use settings::ResolvedConfig;

fn main() -> Result<()> {
	let cli = parse_cli();

	if cli.list_themes {
		for name in theme::names() {
			println!("{name}");
		}
		return Ok(());
	}

	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	if cli.once {
		run_once(&cli, &resolved)
	} else {
		run_interactive(&cli, resolved)
	}
}

/// Fetch the start state once and print the page without entering the
/// terminal UI.
fn run_once(cli: &CliArgs, settings: &ResolvedConfig) -> Result<()> {
	logging::initialize(&LogTarget::Stderr, &cli.log_level)?;

	let client = HttpSearchClient::new(&settings.server, settings.timeout)
		.with_context(|| format!("failed to create a search client for {}", settings.server))?;
	let request = SearchRequest::from_state(&settings.state, settings.page_size, &settings.facets);
	let outcome = client.search(&request);
	if let Err(err) = &outcome {
		tracing::warn!(error = %err, "search failed");
	}

	let view = build_results(
		outcome.as_ref(),
		&settings.state,
		&settings.indexes,
		settings.ui_config().view_options(),
	);
	let link = url_state::encode(&settings.state, &settings.server, &settings.facets);
	print_results(cli.output, &view, link.as_str())?;

	outcome.map(|_| ()).context("search request failed")
}

fn run_interactive(cli: &CliArgs, settings: ResolvedConfig) -> Result<()> {
	match LogTarget::default_file() {
		Ok(target) => logging::initialize(&target, &cli.log_level)?,
		Err(err) => eprintln!("logging disabled: {err:#}"),
	}

	let mut ui = SearchUi::http(&settings.server, settings.timeout)?
		.with_indexes(settings.indexes.clone())
		.with_facets(settings.facets.clone())
		.with_config(settings.ui_config())
		.with_state(settings.state.clone());
	if let Some(name) = &settings.theme {
		ui = ui.with_theme_name(name);
	}

	let outcome = ui.run()?;
	print_outcome(cli.output, &outcome)
}
