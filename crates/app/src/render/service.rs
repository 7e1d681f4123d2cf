//! Render Service

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;

use super::{document::QuotationDocument, errors::RenderError};

/// Configuration for connecting to the rendering service.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Renderer address, e.g. `"http://localhost:8300"`.
    pub addr: String,
}

/// Renders customer-facing documents out of process.
#[automock]
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders the quotation document and returns the PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response.
    async fn render_quotation_pdf(
        &self,
        document: &QuotationDocument,
    ) -> Result<Vec<u8>, RenderError>;
}

/// HTTP client for the rendering service.
#[derive(Debug, Clone)]
pub struct HttpDocumentRenderer {
    config: RendererConfig,
    http: Client,
}

impl HttpDocumentRenderer {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl DocumentRenderer for HttpDocumentRenderer {
    async fn render_quotation_pdf(
        &self,
        document: &QuotationDocument,
    ) -> Result<Vec<u8>, RenderError> {
        let url = format!("{}/render/quotation", self.config.addr);

        let response = self.http.post(&url).json(document).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(RenderError::UnexpectedResponse(format!(
                "render request failed with status {status}: {text}"
            )));
        }

        let bytes = response.bytes().await?;

        Ok(bytes.to_vec())
    }
}
