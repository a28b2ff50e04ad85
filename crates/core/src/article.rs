//! Article identity rules.
//!
//! Article ids double as URL paths (`/<id>`), so they are restricted to
//! lowercase ASCII letters, digits and hyphens. The id `index` names the
//! landing page, which is always public.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Id of the site's landing article (served at `/`).
pub const INDEX_ARTICLE_ID: &str = "index";

/// Body shown for an article that has never been saved.
pub const PLACEHOLDER_MARKDOWN: &str =
    "This article doesn't exist yet, but if you edit it and save it, it will exist!";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Returns `true` if `id` is a well-formed article id.
pub fn is_valid_article_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Validate an article id (non-empty, only lowercase alphanumeric + hyphens).
pub fn validate_article_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Validation("Article id must not be empty".into()));
    }
    if !is_valid_article_id(id) {
        return Err(CoreError::Validation(
            "Article id must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

/// Map a request path segment to an article id. The root path is the index.
pub fn article_id_from_path(segment: &str) -> &str {
    if segment.is_empty() {
        INDEX_ARTICLE_ID
    } else {
        segment
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Whether the article is public no matter what its editors request.
pub fn is_always_public(id: &str) -> bool {
    id == INDEX_ARTICLE_ID
}

/// The visibility an article ends up with after an update.
pub fn effective_visibility(id: &str, requested_public: bool) -> bool {
    is_always_public(id) || requested_public
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_digits_and_hyphens() {
        assert!(is_valid_article_id("index"));
        assert!(is_valid_article_id("rust-notes-2"));
        assert!(validate_article_id("a-b-c").is_ok());
    }

    #[test]
    fn rejects_uppercase_and_punctuation() {
        assert!(!is_valid_article_id("Index"));
        assert!(!is_valid_article_id("_admin"));
        assert!(!is_valid_article_id("a/b"));
        assert!(!is_valid_article_id("caf\u{e9}"));
    }

    #[test]
    fn empty_id_is_a_validation_error() {
        let err = validate_article_id("").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn root_path_maps_to_index() {
        assert_eq!(article_id_from_path(""), "index");
        assert_eq!(article_id_from_path("notes"), "notes");
    }

    #[test]
    fn index_is_always_public() {
        assert!(effective_visibility("index", false));
        assert!(effective_visibility("notes", true));
        assert!(!effective_visibility("notes", false));
    }
}
