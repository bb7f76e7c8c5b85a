//! Terminal building blocks: the prompt input, themes and the widgets that
//! draw cards, the pager and the filter popup.

pub mod components;
pub mod input;
pub mod theme;
