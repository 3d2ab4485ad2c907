//! Bundle content: the bundle type and the pipeline that generates it.
//!
//! [`ContentGenerator`] turns a [`ContentProvider`](crate::provider::ContentProvider)
//! and a [`SelectionCache`](crate::selection::SelectionCache) into complete
//! [`Bundle`]s. A bundle is either complete or not produced at all.

mod bundle;
mod error;
mod generator;
mod idea;

pub use bundle::Bundle;
pub use error::{GenerateError, ImageSlot};
pub use generator::ContentGenerator;
pub use idea::{parse_business_idea, BusinessIdea};
