//! Field catalog reader port.
//!
//! Field definitions are authored by external campaign tooling; the engine
//! only ever reads them. Implementations load fresh on every call so a
//! definition disabled by an admin immediately stops being required for
//! completion purposes.

use async_trait::async_trait;

use crate::domain::catalog::FieldCatalog;
use crate::domain::foundation::{CampaignId, DomainError};

/// Read-side port for a campaign's field definitions.
#[async_trait]
pub trait FieldCatalogReader: Send + Sync {
    /// Loads the enabled field definitions for a campaign, ordered by
    /// `(step_number, sort_order)`.
    ///
    /// An unknown campaign yields an empty catalog, not an error; the flow
    /// layer short-circuits empty catalogs to completed.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on storage failure
    async fn load_catalog(&self, campaign_id: &CampaignId) -> Result<FieldCatalog, DomainError>;
}
