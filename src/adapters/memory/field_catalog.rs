//! In-memory FieldCatalogReader.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::catalog::{FieldCatalog, FieldDefinition};
use crate::domain::foundation::{CampaignId, DomainError};
use crate::ports::FieldCatalogReader;

/// In-memory campaign catalog, seeded up front.
#[derive(Default)]
pub struct InMemoryFieldCatalog {
    campaigns: RwLock<HashMap<CampaignId, Vec<FieldDefinition>>>,
}

impl InMemoryFieldCatalog {
    /// Creates an empty catalog store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the definitions for a campaign.
    pub async fn seed(&self, campaign_id: CampaignId, definitions: Vec<FieldDefinition>) {
        self.campaigns.write().await.insert(campaign_id, definitions);
    }
}

#[async_trait]
impl FieldCatalogReader for InMemoryFieldCatalog {
    async fn load_catalog(&self, campaign_id: &CampaignId) -> Result<FieldCatalog, DomainError> {
        let campaigns = self.campaigns.read().await;
        let definitions = campaigns.get(campaign_id).cloned().unwrap_or_default();
        Ok(FieldCatalog::new(definitions))
    }
}
