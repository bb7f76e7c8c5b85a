//! Widgets composed by the search UI.

pub mod cards;
pub mod filters;
pub mod pager;
pub mod tabs;

pub use cards::{CardListState, card_lines, render_results};
pub use filters::{panel_lines, render_filter_panel};
pub use pager::{StatusContext, pager_line, render_status};
pub use tabs::{InputContext, ProgressState, TabItem, render_input_with_tabs};
