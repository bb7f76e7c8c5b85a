use clap::Arg;
use clap::builder::StyledStr;
use clap::builder::styling::{AnsiColor, Color, Style};

const DEFAULT_MARKER: &str = "(default: ";

fn muted_style() -> Style {
	Style::new()
		.fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)))
		.dimmed()
}

/// Dim every `(default: …)` note in an argument's help text.
pub(super) fn dim_default_notes(arg: Arg) -> Arg {
	let Some(help) = arg.get_help().map(ToString::to_string) else {
		return arg;
	};
	match dim_notes(&help) {
		Some(styled) => arg.help(styled),
		None => arg,
	}
}

fn dim_notes(text: &str) -> Option<StyledStr> {
	let mut styled = StyledStr::new();
	let mut rest = text;
	let mut changed = false;
	while let Some(start) = rest.find(DEFAULT_MARKER) {
		let Some(len) = rest[start..].find(')') else {
			break;
		};
		let end = start + len + 1;
		styled.push_str(&rest[..start]);
		let style = muted_style();
		std::fmt::write(&mut styled, format_args!("{style}{}{style:#}", &rest[start..end])).ok()?;
		rest = &rest[end..];
		changed = true;
	}
	if !changed {
		return None;
	}
	styled.push_str(rest);
	Some(styled)
}
