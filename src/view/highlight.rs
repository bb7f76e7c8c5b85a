use regex::{Regex, RegexBuilder};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// A run of text that is either highlighted or plain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	pub text: String,
	pub highlighted: bool,
}

/// Text split into highlighted and plain runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
	segments: Vec<Segment>,
}

impl RichText {
	#[must_use]
	pub fn plain(text: impl Into<String>) -> Self {
		let mut rich = Self::default();
		rich.push(text, false);
		rich
	}

	/// Append a run, merging it with the previous one when the style matches.
	pub fn push(&mut self, text: impl Into<String>, highlighted: bool) {
		let text = text.into();
		if text.is_empty() {
			return;
		}
		match self.segments.last_mut() {
			Some(last) if last.highlighted == highlighted => last.text.push_str(&text),
			_ => self.segments.push(Segment { text, highlighted }),
		}
	}

	#[must_use]
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	#[must_use]
	pub fn has_highlights(&self) -> bool {
		self.segments.iter().any(|segment| segment.highlighted)
	}

	#[must_use]
	pub fn plain_text(&self) -> String {
		self.segments.iter().map(|segment| segment.text.as_str()).collect()
	}

	/// Render back to `<mark>` markup.
	#[must_use]
	pub fn to_marked(&self) -> String {
		let mut out = String::new();
		for segment in &self.segments {
			if segment.highlighted {
				out.push_str(MARK_OPEN);
				out.push_str(&segment.text);
				out.push_str(MARK_CLOSE);
			} else {
				out.push_str(&segment.text);
			}
		}
		out
	}
}

/// Marks every occurrence of the query's whitespace-separated words,
/// ignoring case.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
	pattern: Option<Regex>,
}

impl Highlighter {
	#[must_use]
	pub fn new(query: &str) -> Self {
		let words: Vec<String> = query.split_whitespace().map(regex::escape).collect();
		if words.is_empty() {
			return Self::disabled();
		}
		let pattern = RegexBuilder::new(&words.join("|"))
			.case_insensitive(true)
			.build()
			.map_err(|err| tracing::warn!(error = %err, "could not build highlight pattern"))
			.ok();
		Self { pattern }
	}

	/// Highlighter that leaves all text plain.
	#[must_use]
	pub fn disabled() -> Self {
		Self { pattern: None }
	}

	#[must_use]
	pub fn is_active(&self) -> bool {
		self.pattern.is_some()
	}

	#[must_use]
	pub fn highlight(&self, text: &str) -> RichText {
		let Some(pattern) = &self.pattern else {
			return RichText::plain(text);
		};
		let mut rich = RichText::default();
		let mut last = 0;
		for found in pattern.find_iter(text) {
			if found.start() == found.end() {
				continue;
			}
			rich.push(&text[last..found.start()], false);
			rich.push(found.as_str(), true);
			last = found.end();
		}
		rich.push(&text[last..], false);
		rich
	}
}

/// Turn server markup such as `a <mark>foo</mark> b` into [`RichText`].
///
/// An unterminated `<mark>` highlights the rest of the text; a stray
/// `</mark>` is dropped.
#[must_use]
pub fn parse_marked(text: &str) -> RichText {
	let mut rich = RichText::default();
	let mut rest = text;
	let mut highlighted = false;
	loop {
		let tag = if highlighted { MARK_CLOSE } else { MARK_OPEN };
		match rest.find(tag) {
			Some(position) => {
				rich.push(&rest[..position], highlighted);
				rest = &rest[position + tag.len()..];
				highlighted = !highlighted;
			}
			None => {
				let remainder = if highlighted {
					rest.to_string()
				} else {
					rest.replace(MARK_CLOSE, "")
				};
				rich.push(remainder, highlighted);
				break;
			}
		}
	}
	rich
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn marks_every_query_word_case_insensitively() {
		let highlighter = Highlighter::new("foo bar");
		let rich = highlighter.highlight("a FOO, then bar");
		assert_eq!(rich.to_marked(), "a <mark>FOO</mark>, then <mark>bar</mark>");
		assert_eq!(rich.plain_text(), "a FOO, then bar");
	}

	#[test]
	fn empty_query_leaves_text_plain() {
		let highlighter = Highlighter::new("   ");
		assert!(!highlighter.is_active());
		let rich = highlighter.highlight("anything");
		assert!(!rich.has_highlights());
	}

	#[test]
	fn regex_metacharacters_are_literal() {
		let rich = Highlighter::new("c++ (x)").highlight("uses c++ and (x) but not cxx");
		assert_eq!(
			rich.to_marked(),
			"uses <mark>c++</mark> and <mark>(x)</mark> but not cxx"
		);
	}

	#[test]
	fn adjacent_matches_merge() {
		let rich = Highlighter::new("ab cd").highlight("abcd");
		assert_eq!(rich.segments().len(), 1);
		assert!(rich.segments()[0].highlighted);
	}

	#[test]
	fn parses_server_markup() {
		let rich = parse_marked("<mark>APT</mark>28 aka <mark>Sofacy</mark>");
		assert_eq!(rich.plain_text(), "APT28 aka Sofacy");
		assert_eq!(
			rich.segments()
				.iter()
				.filter(|segment| segment.highlighted)
				.map(|segment| segment.text.as_str())
				.collect::<Vec<_>>(),
			["APT", "Sofacy"]
		);
	}

	#[test]
	fn tolerates_unbalanced_markup() {
		assert_eq!(parse_marked("x <mark>open").to_marked(), "x <mark>open</mark>");
		assert_eq!(parse_marked("stray</mark> close").plain_text(), "stray close");
	}
}
