pub mod client;
pub mod debounce;
pub mod format;
pub mod state;

pub use client::ProxyClient;
pub use debounce::Debouncer;
pub use state::{Action, BrowseState, Effect, FilterChip, Phase, ResultsView};
