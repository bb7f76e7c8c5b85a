use crate::search::{IndexKind, Pagination};

use super::highlight::RichText;

pub const NO_TITLE: &str = "No Title";
pub const NO_DESCRIPTION: &str = "No Description";
pub const NO_RESULTS: &str = "No results found";
pub const FETCH_ERROR: &str = "Error retrieving search results";

/// Display form of an arbitrary JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueView {
	Text(RichText),
	List(Vec<ValueView>),
	Table(TableView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
	pub key: String,
	pub value: ValueView,
}

/// Key/value rows, possibly nested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
	pub rows: Vec<TableRow>,
}

impl TableView {
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&ValueView> {
		self.rows.iter().find(|row| row.key == key).map(|row| &row.value)
	}
}

/// External page a card points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
	pub label: String,
	pub href: String,
}

/// One rendered hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
	pub kind: IndexKind,
	pub index_uid: Option<String>,
	pub title: RichText,
	pub link: Option<LinkView>,
	pub description: RichText,
	/// Remaining fields; shown collapsed until expanded.
	pub details: TableView,
}

/// Previous/Next controls and counters for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerView {
	pub page: u32,
	pub total_pages: u32,
	pub total_hits: u64,
	pub has_previous: bool,
	pub has_next: bool,
}

impl From<Pagination> for PagerView {
	fn from(pagination: Pagination) -> Self {
		Self {
			page: pagination.page,
			total_pages: pagination.total_pages(),
			total_hits: pagination.total_hits,
			has_previous: pagination.has_previous(),
			has_next: pagination.has_next(),
		}
	}
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsView {
	#[default]
	Idle,
	Loading,
	Cards {
		cards: Vec<CardView>,
		pager: PagerView,
	},
	Empty,
	Error,
}

impl ResultsView {
	#[must_use]
	pub fn cards(&self) -> &[CardView] {
		match self {
			Self::Cards { cards, .. } => cards,
			_ => &[],
		}
	}

	#[must_use]
	pub fn pager(&self) -> Option<PagerView> {
		match self {
			Self::Cards { pager, .. } => Some(*pager),
			_ => None,
		}
	}

	/// Status text for the non-card states.
	#[must_use]
	pub fn message(&self) -> Option<&'static str> {
		match self {
			Self::Idle | Self::Cards { .. } => None,
			Self::Loading => Some("Searching…"),
			Self::Empty => Some(NO_RESULTS),
			Self::Error => Some(FETCH_ERROR),
		}
	}
}
