//! Terminal client for the MISP galaxy, object and taxonomy search service.
//!
//! The root module re-exports the pieces embedders need most: the search
//! state and HTTP client, the pure view builders and the interactive UI.

pub mod app_dirs;
pub mod logging;
pub mod search;
pub mod tui;
pub mod ui;
pub mod view;

pub use search::{
	FacetCatalog, FacetSpec, HttpSearchClient, IndexCatalog, IndexSelector, SearchBackend,
	SearchError, SearchRequest, SearchResponse, SearchState,
};
pub use tui::theme::{Theme, default_theme};
pub use ui::{App, SearchOutcome, SearchSelection, SearchUi, UiConfig};
pub use view::{ResultsView, ViewOptions, build_card, build_results};
