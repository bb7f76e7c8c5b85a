//! Search state, the wire contract with the remote `/search` endpoint, and
//! the background fetch worker.

mod client;
mod debounce;
mod facets;
mod index;
mod pagination;
mod request;
mod response;
mod state;
pub mod url_state;
pub mod worker;

pub use client::{
	DEFAULT_SERVER_URL, DEFAULT_TIMEOUT, HttpSearchClient, SearchBackend, SearchError,
	search_endpoint,
};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use facets::{
	FacetCatalog, FacetDistribution, FacetOption, FacetSpec, FilterGroup, FilterPanel, Filters,
};
pub use index::{DEFAULT_INDEXES, IndexCatalog, IndexKind, IndexSelector};
pub use pagination::Pagination;
pub use request::{DEFAULT_PAGE_SIZE, SearchRequest};
pub use response::{Hit, IndexSection, ResponseError, SearchResponse};
pub use state::SearchState;
