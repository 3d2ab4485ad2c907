//! The content bundle shown to a participant.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::GenerateError;

/// One fully generated game round: a fake business with its slogan, two
/// images and a celebratory animation.
///
/// Every content field is non-empty; the only way to obtain a bundle is
/// through [`Bundle::new`], which enforces that. Bundles are immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    business_name: String,
    slogan: String,
    image1: String,
    image2: String,
    #[serde(rename = "clappingGif")]
    asset: String,
    created_at: DateTime<Utc>,
}

impl Bundle {
    /// Assembles a bundle, stamping it with the current time.
    pub fn new(
        business_name: String,
        slogan: String,
        image1: String,
        image2: String,
        asset: String,
    ) -> Result<Self, GenerateError> {
        for (field, value) in [
            ("business_name", &business_name),
            ("slogan", &slogan),
            ("image1", &image1),
            ("image2", &image2),
            ("asset", &asset),
        ] {
            if value.trim().is_empty() {
                return Err(GenerateError::Incomplete { field });
            }
        }

        Ok(Self {
            business_name,
            slogan,
            image1,
            image2,
            asset,
            created_at: Utc::now(),
        })
    }

    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    pub fn slogan(&self) -> &str {
        &self.slogan
    }

    /// The two generated images, in slot order.
    pub fn images(&self) -> [&str; 2] {
        [&self.image1, &self.image2]
    }

    /// The supplementary animation.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
