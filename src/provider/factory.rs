use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ProviderConfig;
use crate::provider::{ProviderError, ServerDataProvider};
use crate::serializer::SettingsSerializer;
use crate::timer::{Timer, TokioTimer};
use crate::transport::{HttpTransport, Transport};

/// Creates [`ServerDataProvider`]s that share one configuration, transport
/// and timer.
pub struct ServerDataProviderFactory {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
    timer: Arc<dyn Timer>,
    serializer: Option<Arc<dyn SettingsSerializer>>,
}

impl ServerDataProviderFactory {
    /// Validates `config` and builds the default HTTP transport from it.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let transport = HttpTransport::new(&config.http)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            timer: Arc::new(TokioTimer),
            serializer: None,
        }
    }

    pub fn timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    /// Serializer installed on every provider this factory creates.
    pub fn settings_serializer(mut self, serializer: Arc<dyn SettingsSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn create<R>(&self, resource_url: impl Into<String>) -> ServerDataProvider<R>
    where
        R: DeserializeOwned + Send + Sync + 'static,
    {
        let provider = ServerDataProvider::new(
            resource_url,
            &self.config,
            self.transport.clone(),
            self.timer.clone(),
        );
        if let Some(serializer) = &self.serializer {
            provider.set_settings_serializer(Some(serializer.clone()));
        }
        tracing::debug!(
            resource_url = %provider.resource_url(),
            debounce_ms = self.config.debounce_ms,
            "Provider created"
        );
        provider
    }
}
