//! Site adapters, one per supported source.
//!
//! Each adapter owns its lookup protocol (direct slug, search-then-filter,
//! redirect-or-list, side-channel API), composes [`GenericExtractor`] for
//! the default getters and overrides only the quirky ones.
//!
//! [`GenericExtractor`]: crate::GenericExtractor

pub mod fc2;
pub mod javdb;
pub mod javlibrary;
pub mod mgstage;

use url::Url;

use crate::types::{FailureKind, ScrapeError};

/// Resolves a possibly relative search-result href against the page it came
/// from.
pub(crate) fn resolve_link(base: &str, href: &str) -> Result<String, ScrapeError> {
    let base = Url::parse(base)
        .map_err(|err| ScrapeError::new(FailureKind::InvalidUrl, format!("{base}: {err}")))?;
    let resolved = base
        .join(href)
        .map_err(|err| ScrapeError::new(FailureKind::InvalidUrl, format!("{href}: {err}")))?;
    Ok(resolved.into())
}

/// Folds CR/LF variants and doubled blank lines out of outline text.
pub(crate) fn normalize_intro(intro: &str) -> String {
    let mut text = intro.replace("\r\n", "\n").replace('\r', "\n");
    while text.contains("\n\n") {
        text = text.replace("\n\n", "\n");
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_intro_folds_line_endings() {
        assert_eq!(normalize_intro("a\r\n\r\nb\rc\n\n\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn resolve_link_handles_relative_and_absolute() {
        let base = "https://example.com/vl_searchbyid.php?keyword=X";
        assert_eq!(
            resolve_link(base, "./?v=javabc").unwrap(),
            "https://example.com/?v=javabc"
        );
        assert_eq!(
            resolve_link(base, "https://other.example/x").unwrap(),
            "https://other.example/x"
        );
    }
}
