//! Country directory entries.

use serde::{Deserialize, Serialize};

/// A country card as listed by `GET /api/countries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryEntry {
    pub id: String,
    pub name: String,
    /// Flag image URL.
    pub flag: String,
    /// Where a click on the card navigates to.
    pub redirect_url: String,
}
