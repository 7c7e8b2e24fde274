use serde::{Deserialize, Serialize};

/// A country from the directory's reference dataset.
///
/// Restaurants reference countries by `code`; API responses resolve the code
/// to the name through a map preloaded per request batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Numeric country code from the source dataset.
    pub code: u16,
    /// Display name, e.g. "India".
    pub name: String,
}

impl Country {
    pub fn new(code: u16, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}
