//! Query-string types shared by several handler modules.

use serde::Deserialize;

/// `?status=` on ad request listings. Parsed with `parse_status_filter`, so
/// an unknown value is a validation error rather than an empty result.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}
