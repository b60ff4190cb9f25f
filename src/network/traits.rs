use crate::models::Property;
use crate::network::types::MarsApiFilter;
use anyhow::Result;
use async_trait::async_trait;

/// Source of Mars property listings
/// The view model only talks to this trait so tests can swap in a stub
#[async_trait]
pub trait MarsApiService: Send + Sync {
    /// Fetch every property matching the filter
    async fn get_properties(&self, filter: MarsApiFilter) -> Result<Vec<Property>>;
}
