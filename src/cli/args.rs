use std::fmt::Write;
use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{ArgAction, ColorChoice, Command, CommandFactory, FromArgMatches, Parser, ValueEnum};
use misp_search::{IndexSelector, app_dirs};

use super::help::dim_default_notes;

/// Version banner with the resolved directories.
fn long_version() -> &'static str {
	let config_dir = match app_dirs::get_config_dir() {
		Ok(path) => path.display().to_string(),
		Err(err) => format!("unavailable ({err})"),
	};
	let data_dir = match app_dirs::get_data_dir() {
		Ok(path) => path.display().to_string(),
		Err(err) => format!("unavailable ({err})"),
	};
	let cache_dir = match app_dirs::get_cache_dir() {
		Ok(path) => path.display().to_string(),
		Err(err) => format!("unavailable ({err})"),
	};

	let mut details = format!("misp-search {}", env!("CARGO_PKG_VERSION"));
	let _ = writeln!(details);
	let _ = writeln!(details, "config directory: {config_dir}");
	let _ = writeln!(details, "data directory: {data_dir}");
	let _ = writeln!(details, "log directory: {cache_dir}");

	Box::leak(details.into_boxed_str())
}

fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into [`CliArgs`].
pub(crate) fn parse_cli() -> CliArgs {
	let mut matches = tinted_cli_command().get_matches();
	CliArgs::from_arg_matches_mut(&mut matches).unwrap_or_else(|err| err.exit())
}

fn tinted_cli_command() -> Command {
	CliArgs::command().mut_args(dim_default_notes)
}

#[derive(Parser, Debug)]
#[command(
	name = "misp-search",
	version,
	long_version = long_version(),
	about = "Search MISP galaxies, objects and taxonomies from the terminal",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
/// Command-line arguments accepted by the `misp-search` binary.
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short,
		long,
		value_name = "URL",
		help = "Base URL of the search front-end (default: http://localhost:8001)"
	)]
	pub(crate) server: Option<String>,
	#[arg(
		short = 'L',
		long,
		value_name = "LINK",
		help = "Restore a search from a state link or its query string (default: none)"
	)]
	pub(crate) link: Option<String>,
	#[arg(
		short,
		long,
		value_name = "QUERY",
		help = "Search text; overrides the link (default: empty)"
	)]
	pub(crate) query: Option<String>,
	#[arg(
		short,
		long,
		value_name = "INDEX",
		help = "Index position or \"all\"; overrides the link (default: 0)"
	)]
	pub(crate) index: Option<IndexSelector>,
	#[arg(
		short = 'P',
		long,
		value_name = "NUM",
		help = "Result page; overrides the link (default: 1)"
	)]
	pub(crate) page: Option<u32>,
	#[arg(long, value_name = "NUM", help = "Results per page (default: 10)")]
	pub(crate) page_size: Option<u32>,
	#[arg(
		long,
		value_name = "MS",
		help = "Quiet period after typing before searching (default: 300)"
	)]
	pub(crate) debounce_ms: Option<u64>,
	#[arg(long, value_name = "SECS", help = "HTTP request timeout (default: 10)")]
	pub(crate) timeout_secs: Option<u64>,
	#[arg(long, value_name = "THEME", help = "Select a theme by name (default: default)")]
	pub(crate) theme: Option<String>,
	#[arg(long, help = "Disable match highlighting (default: disabled)")]
	pub(crate) no_highlight: bool,
	#[arg(
		long,
		help = "Run one search, print the results and exit (default: disabled)"
	)]
	pub(crate) once: bool,
	#[arg(
		short = 'p',
		long = "print-config",
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		short = 'l',
		long = "list-themes",
		help = "List supported themes and exit (default: disabled)"
	)]
	pub(crate) list_themes: bool,
	#[arg(
		long,
		value_name = "FILTER",
		default_value = "info",
		help = "Log filter used when MISP_SEARCH_LOG is unset"
	)]
	pub(crate) log_level: String,
	#[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Plain, help = "Choose how to print the result")]
	pub(crate) output: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Output formats supported by the CLI utility.
pub(crate) enum OutputFormat {
	Plain,
	Json,
}
