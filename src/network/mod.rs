pub mod service;
pub mod traits;
pub mod types;

pub use service::MarsApiClient;
pub use traits::MarsApiService;
pub use types::{ApiConfig, MarsApiFilter};
