pub mod detail;
pub mod search;
pub mod widgets;

pub use detail::render_detail_view;
pub use search::{Focus, render_search_view};
