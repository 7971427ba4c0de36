//! Reuse-or-recompute dialog shown when the backend offers a prior analysis.

use async_trait::async_trait;
use buywise_client::AdvisorClient;
use buywise_core::{AnalysisResult, ExistingAnalysis, MemoryChoiceRequest, ProductData};
use tracing::info;

use crate::error::{HostError, PopupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryChoice {
    UseExisting,
    NewAnalysis,
}

/// Modal prompt. Resolves only once the shopper picked one of the two
/// branches; there is no cancel.
#[async_trait]
pub trait MemoryPrompt: Send + Sync {
    async fn choose(&self, existing: &ExistingAnalysis) -> Result<MemoryChoice, HostError>;
}

/// Open dialog holding what either branch needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDialog {
    existing: ExistingAnalysis,
    product: ProductData,
}

impl MemoryDialog {
    #[must_use]
    pub fn new(existing: ExistingAnalysis, product: ProductData) -> Self {
        Self { existing, product }
    }

    #[must_use]
    pub fn existing(&self) -> &ExistingAnalysis {
        &self.existing
    }

    /// Closes the dialog with `choice`, producing the memory-choice request.
    #[must_use]
    pub fn resolve(self, choice: MemoryChoice) -> MemoryChoiceRequest {
        match choice {
            MemoryChoice::UseExisting => MemoryChoiceRequest::UseExisting {
                product_id: self.existing.product_id,
            },
            MemoryChoice::NewAnalysis => {
                let mut product = self.product;
                product.force_new_analysis = true;
                MemoryChoiceRequest::NewAnalysis {
                    product_data: Box::new(product),
                }
            }
        }
    }

    /// Prompts, then posts the chosen branch to the memory-choice endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PopupError::Prompt`] if the host prompt fails, otherwise the
    /// classified backend error; a server `error` field arrives verbatim as
    /// [`PopupError::Server`].
    pub async fn run(
        self,
        prompt: &dyn MemoryPrompt,
        client: &AdvisorClient,
    ) -> Result<AnalysisResult, PopupError> {
        let choice = prompt
            .choose(&self.existing)
            .await
            .map_err(|e| PopupError::Prompt(e.to_string()))?;
        info!(product_id = %self.existing.product_id, ?choice, "memory choice made");

        let request = self.resolve(choice);
        client
            .handle_memory_choice(&request)
            .await
            .map_err(|e| PopupError::from_client(e, client.location()))
    }
}
