//! Bundle generation pipeline.
//!
//! A bundle is built in fixed order:
//!
//! ```text
//! business idea ─► asset pick ─► image prompt 1 ─► image 1 ─► image prompt 2 ─► image 2
//!   (retried)      (never fails)     (retried)       (retried)     (retried)       (retried)
//! ```
//!
//! Any retried step that fails aborts the bundle. Cancellation is checked
//! between steps and observed inside every retry wait.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::bundle::Bundle;
use super::error::{GenerateError, ImageSlot};
use super::idea::{parse_business_idea, BusinessIdea};
use crate::provider::{prompt, AssetSearch, ContentProvider};
use crate::retry::RetryPolicy;
use crate::selection::SelectionCache;

/// Produces complete bundles from a content provider and a selection cache.
pub struct ContentGenerator<P: ContentProvider, S: AssetSearch> {
    provider: P,
    selection: Arc<SelectionCache<S>>,
    retry: RetryPolicy,
}

impl<P: ContentProvider, S: AssetSearch> ContentGenerator<P, S> {
    pub fn new(provider: P, selection: Arc<SelectionCache<S>>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            selection,
            retry,
        }
    }

    /// Generates one complete bundle.
    #[instrument(level = "debug", skip_all, fields(provider = self.provider.name()))]
    pub async fn generate(&self, cancel: &CancellationToken) -> Result<Bundle, GenerateError> {
        checkpoint(cancel)?;
        let idea = self.business_idea(cancel).await?;

        checkpoint(cancel)?;
        let asset = self.selection.pick(cancel).await;

        checkpoint(cancel)?;
        let image1 = self.image(ImageSlot::First, cancel).await?;

        checkpoint(cancel)?;
        let image2 = self.image(ImageSlot::Second, cancel).await?;

        let bundle = Bundle::new(idea.name, idea.slogan, image1, image2, asset)?;
        debug!(business_name = bundle.business_name(), "Bundle generated");
        Ok(bundle)
    }

    async fn business_idea(
        &self,
        cancel: &CancellationToken,
    ) -> Result<BusinessIdea, GenerateError> {
        let text_prompt = prompt::business_idea_prompt().map_err(GenerateError::Prompt)?;

        self.retry
            .run(cancel, || async {
                let text = self.provider.generate_text(&text_prompt).await?;
                parse_business_idea(&text)
            })
            .await
            .map_err(|e| GenerateError::from_step(e, GenerateError::BusinessIdea))
    }

    async fn image(
        &self,
        slot: ImageSlot,
        cancel: &CancellationToken,
    ) -> Result<String, GenerateError> {
        let text_prompt = prompt::image_prompt().map_err(GenerateError::Prompt)?;

        let image_prompt = self
            .retry
            .run(cancel, || self.provider.generate_text(&text_prompt))
            .await
            .map_err(|e| {
                GenerateError::from_step(e, |source| GenerateError::ImagePrompt { slot, source })
            })?;

        checkpoint(cancel)?;
        let image_prompt = image_prompt.trim();

        self.retry
            .run(cancel, || self.provider.generate_image(image_prompt))
            .await
            .map_err(|e| {
                GenerateError::from_step(e, |source| GenerateError::Image { slot, source })
            })
    }
}

fn checkpoint(cancel: &CancellationToken) -> Result<(), GenerateError> {
    if cancel.is_cancelled() {
        Err(GenerateError::Cancelled)
    } else {
        Ok(())
    }
}
