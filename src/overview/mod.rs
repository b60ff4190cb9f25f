pub mod adapter;
pub mod diff;
pub mod view_model;

pub use adapter::PhotoGridAdapter;
pub use diff::ListUpdate;
pub use view_model::{FetchStatus, OverviewViewModel};
