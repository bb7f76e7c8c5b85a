//! Turns search responses into display trees: cards, highlighted text and
//! the pager.

mod card;
mod highlight;
mod results;
mod tree;

pub use card::build_card;
pub use highlight::{Highlighter, MARK_CLOSE, MARK_OPEN, RichText, Segment, parse_marked};
pub use results::{ViewOptions, build_results, visible_hits};
pub use tree::{
	CardView, FETCH_ERROR, LinkView, NO_DESCRIPTION, NO_RESULTS, NO_TITLE, PagerView,
	ResultsView, TableRow, TableView, ValueView,
};
