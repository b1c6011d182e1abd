//! Runtime services and shared state for the car-advisor.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{dataset::DatasetSnapshot, llm::LlmClient, web},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the LLM client, and the optional
/// dataset.  Everything in it is read-only after startup, and it is designed
/// to be trivially cloneable, allowing it to be passed around without the
/// need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The reference dataset, when one is configured.
    pub dataset: Option<DatasetSnapshot>,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// A configured dataset that cannot be loaded is fatal.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Load the dataset.
        let dataset = match &config.dataset_path {
            Some(path) => Some(DatasetSnapshot::load(path, &config.dataset_brand_column)?),
            None => None,
        };

        // Initialize the LLM client.
        let llm = LlmClient::from_config(&config)?;

        info!("Using {} with model `{}`.", llm.name(), config.model);

        Ok(Self { config, llm, dataset })
    }

    /// The dataset text to include in prompts, if any.
    pub fn serialized_dataset(&self) -> Option<&str> {
        self.dataset.as_ref().map(|dataset| dataset.serialized())
    }

    pub async fn start(&self) -> Void {
        web::serve(self.clone()).await
    }
}
