/// Page arithmetic for a result set of `total_hits` split into fixed pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
	pub page: u32,
	pub page_size: u32,
	pub total_hits: u64,
}

impl Pagination {
	#[must_use]
	pub fn new(page: u32, page_size: u32, total_hits: u64) -> Self {
		Self {
			page: page.max(1),
			page_size: page_size.max(1),
			total_hits,
		}
	}

	/// Number of pages, never less than one so an empty result still has a
	/// page to show.
	#[must_use]
	pub fn total_pages(&self) -> u32 {
		let pages = self.total_hits.div_ceil(u64::from(self.page_size)).max(1);
		u32::try_from(pages).unwrap_or(u32::MAX)
	}

	/// Zero-based position of the first hit on this page.
	#[must_use]
	pub fn offset(&self) -> u64 {
		u64::from(self.page - 1) * u64::from(self.page_size)
	}

	#[must_use]
	pub fn has_previous(&self) -> bool {
		self.page > 1
	}

	#[must_use]
	pub fn has_next(&self) -> bool {
		self.page < self.total_pages()
	}

	/// Limit a page of hits to the page size.
	#[must_use]
	pub fn visible<'a, T>(&self, hits: &'a [T]) -> &'a [T] {
		let limit = usize::try_from(self.page_size).unwrap_or(usize::MAX);
		&hits[..hits.len().min(limit)]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn last_partial_page_has_no_next() {
		let pagination = Pagination::new(2, 10, 15);
		assert_eq!(pagination.total_pages(), 2);
		assert_eq!(pagination.offset(), 10);
		assert!(pagination.has_previous());
		assert!(!pagination.has_next());
	}

	#[test]
	fn first_page_of_many() {
		let pagination = Pagination::new(1, 10, 15);
		assert!(!pagination.has_previous());
		assert!(pagination.has_next());
	}

	#[test]
	fn empty_results_still_have_one_page() {
		let pagination = Pagination::new(0, 0, 0);
		assert_eq!(pagination.page, 1);
		assert_eq!(pagination.total_pages(), 1);
		assert!(!pagination.has_next());
	}

	#[test]
	fn visible_trims_oversized_pages() {
		let pagination = Pagination::new(1, 3, 100);
		let hits = [1, 2, 3, 4, 5];
		assert_eq!(pagination.visible(&hits), &[1, 2, 3]);
		assert_eq!(pagination.visible(&hits[..2]), &[1, 2]);
	}
}
