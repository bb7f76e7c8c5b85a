use std::fmt;
use std::str::FromStr;

/// Index uids served by a stock MISP global search deployment.
pub const DEFAULT_INDEXES: [&str; 3] = ["misp-galaxy", "misp-objects", "misp-taxonomies"];

/// Which index a search targets: every index at once, or one by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexSelector {
	All,
	Position(usize),
}

impl Default for IndexSelector {
	fn default() -> Self {
		Self::Position(0)
	}
}

impl IndexSelector {
	/// Value used for the `index` query parameter.
	#[must_use]
	pub fn as_param(self) -> String {
		match self {
			Self::All => "all".to_string(),
			Self::Position(position) => position.to_string(),
		}
	}

	/// Parse a wire value, falling back to `default` when it is not recognised.
	#[must_use]
	pub fn parse_or(value: &str, default: Self) -> Self {
		value.parse().unwrap_or(default)
	}
}

impl fmt::Display for IndexSelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.as_param())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid index selector '{0}' (expected \"all\" or a position)")]
pub struct ParseIndexSelectorError(String);

impl FromStr for IndexSelector {
	type Err = ParseIndexSelectorError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let trimmed = value.trim();
		if trimmed.eq_ignore_ascii_case("all") {
			return Ok(Self::All);
		}
		trimmed
			.parse::<usize>()
			.map(Self::Position)
			.map_err(|_| ParseIndexSelectorError(value.to_string()))
	}
}

/// Shape of the documents stored in an index, used to pick card fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
	Galaxy,
	Object,
	Taxonomy,
	Generic,
}

impl IndexKind {
	/// Classify an index uid such as `misp-galaxy` or `misp-taxonomies_new`.
	#[must_use]
	pub fn from_uid(uid: &str) -> Self {
		let uid = uid.to_ascii_lowercase();
		if uid.contains("galaxy") {
			Self::Galaxy
		} else if uid.contains("object") {
			Self::Object
		} else if uid.contains("taxonom") {
			Self::Taxonomy
		} else {
			Self::Generic
		}
	}

	#[must_use]
	pub fn label(self) -> &'static str {
		match self {
			Self::Galaxy => "galaxy",
			Self::Object => "object",
			Self::Taxonomy => "taxonomy",
			Self::Generic => "document",
		}
	}
}

/// Ordered list of index uids offered by the index selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCatalog {
	names: Vec<String>,
}

impl Default for IndexCatalog {
	fn default() -> Self {
		Self::new(DEFAULT_INDEXES)
	}
}

impl IndexCatalog {
	pub fn new<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			names: names.into_iter().map(Into::into).collect(),
		}
	}

	#[must_use]
	pub fn names(&self) -> &[String] {
		&self.names
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.names.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Resolve a selector to an index uid. Positions past the end clamp to the
	/// last index, matching how the search service interprets them.
	#[must_use]
	pub fn name_for(&self, selector: IndexSelector) -> Option<&str> {
		match selector {
			IndexSelector::All => None,
			IndexSelector::Position(position) => {
				let last = self.names.len().checked_sub(1)?;
				self.names.get(position.min(last)).map(String::as_str)
			}
		}
	}

	/// Human-readable label for a selector.
	#[must_use]
	pub fn label_for(&self, selector: IndexSelector) -> String {
		match selector {
			IndexSelector::All => "All".to_string(),
			IndexSelector::Position(_) => self
				.name_for(selector)
				.map(str::to_string)
				.unwrap_or_else(|| selector.as_param()),
		}
	}

	/// Every selectable entry in display order: `All` first, then each index.
	#[must_use]
	pub fn selectors(&self) -> Vec<IndexSelector> {
		std::iter::once(IndexSelector::All)
			.chain((0..self.names.len()).map(IndexSelector::Position))
			.collect()
	}

	/// Clamp a selector so it always points at an existing entry.
	#[must_use]
	pub fn normalize(&self, selector: IndexSelector) -> IndexSelector {
		match selector {
			IndexSelector::All => IndexSelector::All,
			IndexSelector::Position(_) if self.names.is_empty() => IndexSelector::All,
			IndexSelector::Position(position) => {
				IndexSelector::Position(position.min(self.names.len() - 1))
			}
		}
	}

	#[must_use]
	pub fn next(&self, selector: IndexSelector) -> IndexSelector {
		self.step(selector, 1)
	}

	#[must_use]
	pub fn previous(&self, selector: IndexSelector) -> IndexSelector {
		self.step(selector, -1)
	}

	fn step(&self, selector: IndexSelector, delta: isize) -> IndexSelector {
		let selectors = self.selectors();
		let current = selectors
			.iter()
			.position(|candidate| *candidate == self.normalize(selector))
			.unwrap_or(0);
		let len = selectors.len() as isize;
		let next = (current as isize + delta).rem_euclid(len) as usize;
		selectors[next]
	}

	/// Kind of documents behind a selector, when it names a single index.
	#[must_use]
	pub fn kind_for(&self, selector: IndexSelector) -> IndexKind {
		self.name_for(selector)
			.map(IndexKind::from_uid)
			.unwrap_or(IndexKind::Generic)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn selector_parses_all_and_positions() {
		assert_eq!("all".parse::<IndexSelector>(), Ok(IndexSelector::All));
		assert_eq!("ALL".parse::<IndexSelector>(), Ok(IndexSelector::All));
		assert_eq!("2".parse::<IndexSelector>(), Ok(IndexSelector::Position(2)));
		assert!("-1".parse::<IndexSelector>().is_err());
		assert_eq!(
			IndexSelector::parse_or("bogus", IndexSelector::All),
			IndexSelector::All
		);
	}

	#[test]
	fn kind_is_derived_from_uid() {
		assert_eq!(IndexKind::from_uid("misp-galaxy"), IndexKind::Galaxy);
		assert_eq!(IndexKind::from_uid("misp-objects"), IndexKind::Object);
		assert_eq!(IndexKind::from_uid("misp-taxonomies_new"), IndexKind::Taxonomy);
		assert_eq!(IndexKind::from_uid("movies"), IndexKind::Generic);
	}

	#[test]
	fn positions_clamp_to_last_index() {
		let catalog = IndexCatalog::default();
		assert_eq!(
			catalog.name_for(IndexSelector::Position(9)),
			Some("misp-taxonomies")
		);
		assert_eq!(catalog.name_for(IndexSelector::All), None);
		assert_eq!(
			catalog.normalize(IndexSelector::Position(9)),
			IndexSelector::Position(2)
		);
	}

	#[test]
	fn cycling_wraps_through_all() {
		let catalog = IndexCatalog::new(["a", "b"]);
		assert_eq!(catalog.next(IndexSelector::All), IndexSelector::Position(0));
		assert_eq!(
			catalog.next(IndexSelector::Position(1)),
			IndexSelector::All
		);
		assert_eq!(
			catalog.previous(IndexSelector::All),
			IndexSelector::Position(1)
		);
	}

	#[test]
	fn empty_catalog_only_offers_all() {
		let catalog = IndexCatalog::new(Vec::<String>::new());
		assert_eq!(catalog.selectors(), vec![IndexSelector::All]);
		assert_eq!(catalog.next(IndexSelector::Position(0)), IndexSelector::All);
		assert_eq!(catalog.label_for(IndexSelector::Position(0)), "0");
	}
}
