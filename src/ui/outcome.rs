use crate::search::{Hit, IndexKind, SearchState};
use crate::view::CardView;

/// The card the user accepted with Enter.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSelection {
	pub kind: IndexKind,
	pub title: String,
	pub link: Option<String>,
	pub hit: Hit,
}

impl SearchSelection {
	#[must_use]
	pub fn new(card: &CardView, hit: Hit) -> Self {
		Self {
			kind: card.kind,
			title: card.title.plain_text(),
			link: card.link.as_ref().map(|link| link.href.clone()),
			hit,
		}
	}
}

/// How the interactive session ended.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
	pub accepted: bool,
	pub state: SearchState,
	/// State link for reopening the same search.
	pub link: String,
	pub selection: Option<SearchSelection>,
}
