//! Parsing of the generated business idea.

use crate::provider::prompt::{NAME_PREFIX, SLOGAN_DELIMITER};
use crate::provider::ProviderError;

/// A generated business name and its slogan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessIdea {
    pub name: String,
    pub slogan: String,
}

/// Parses a `Name: <name> Slogan: <slogan>` response.
///
/// Markdown emphasis around either part is tolerated. A response without
/// exactly one slogan delimiter, or with an empty part, is
/// [`ProviderError::UnparseableContent`].
pub fn parse_business_idea(text: &str) -> Result<BusinessIdea, ProviderError> {
    let parts: Vec<&str> = text.split(SLOGAN_DELIMITER).collect();
    let [name, slogan] = parts.as_slice() else {
        return Err(ProviderError::UnparseableContent(format!(
            "expected 'Name: ... Slogan: ...', got: {}",
            text.trim()
        )));
    };

    let name = clean(clean(name).trim_start_matches(NAME_PREFIX));
    let slogan = clean(slogan);

    if name.is_empty() || slogan.is_empty() {
        return Err(ProviderError::UnparseableContent(format!(
            "empty name or slogan in: {}",
            text.trim()
        )));
    }

    Ok(BusinessIdea {
        name: name.to_string(),
        slogan: slogan.to_string(),
    })
}

fn clean(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '*')
}
