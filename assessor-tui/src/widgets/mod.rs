//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod status;

pub use detail::DetailPanel;
pub use filter::{FilterBar, FilterGroup, FilterOption};
pub use status::StatusIndicator;
