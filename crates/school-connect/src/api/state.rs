use std::sync::Arc;

use super::access::CredentialTable;
use crate::config::{AppConfig, Credential, SiteConfig};
use crate::store::SchoolStore;

/// Shared router state: the store plus the request-independent settings.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub store: Arc<SchoolStore>,
    pub credentials: Arc<CredentialTable>,
    pub site: Arc<SiteConfig>,
}

impl ApiState {
    pub fn new(
        store: Arc<SchoolStore>,
        site: SiteConfig,
        credentials: impl IntoIterator<Item = Credential>,
    ) -> Self {
        Self {
            store,
            credentials: Arc::new(CredentialTable::new(credentials)),
            site: Arc::new(site),
        }
    }

    pub fn from_config(config: &AppConfig, store: Arc<SchoolStore>) -> Self {
        Self::new(
            store,
            config.site.clone(),
            config.auth.credentials.iter().cloned(),
        )
    }
}
