use std::collections::BTreeSet;

use super::facets::Filters;
use super::index::IndexSelector;

/// Everything that determines which results are on screen.
///
/// The state is owned by the caller and passed explicitly to request
/// building, link encoding and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
	pub query: String,
	pub index: IndexSelector,
	pub page: u32,
	pub filters: Filters,
}

impl Default for SearchState {
	fn default() -> Self {
		Self::new(String::new(), IndexSelector::default())
	}
}

impl SearchState {
	#[must_use]
	pub fn new(query: impl Into<String>, index: IndexSelector) -> Self {
		Self {
			query: query.into(),
			index,
			page: 1,
			filters: Filters::new(),
		}
	}

	#[must_use]
	pub fn with_page(mut self, page: u32) -> Self {
		self.page = page.max(1);
		self
	}

	#[must_use]
	pub fn with_filter<I, S>(mut self, param: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
		if !values.is_empty() {
			self.filters.insert(param.into(), values);
		}
		self
	}

	/// Update the query. Returns whether it changed; a change restarts
	/// pagination.
	pub fn set_query(&mut self, query: &str) -> bool {
		if self.query == query {
			return false;
		}
		self.query = query.to_string();
		self.page = 1;
		true
	}

	pub fn set_index(&mut self, index: IndexSelector) -> bool {
		if self.index == index {
			return false;
		}
		self.index = index;
		self.page = 1;
		true
	}

	/// Replace the filter selection, dropping empty categories.
	pub fn set_filters(&mut self, mut filters: Filters) -> bool {
		filters.retain(|_, values| !values.is_empty());
		if self.filters == filters {
			return false;
		}
		self.filters = filters;
		self.page = 1;
		true
	}

	pub fn next_page(&mut self) {
		self.page = self.page.saturating_add(1);
	}

	/// Step back one page. Returns false when already on the first page.
	pub fn previous_page(&mut self) -> bool {
		if self.page <= 1 {
			self.page = 1;
			return false;
		}
		self.page -= 1;
		true
	}

	#[must_use]
	pub fn filters_for(&self, param: &str) -> Option<&BTreeSet<String>> {
		self.filters.get(param)
	}

	#[must_use]
	pub fn active_filter_count(&self) -> usize {
		self.filters.values().map(BTreeSet::len).sum()
	}
}
