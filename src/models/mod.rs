pub mod companies;
pub mod interviews;
pub mod jobs;
pub mod reviews;
pub mod saved_jobs;
pub mod users;

use serde::Deserialize;

use crate::error::ListingError;
use crate::listing::Cursor;

/// Cursor and page size of a listing request: `?cursor=<id>&limit=<n>`.
///
/// Filter keys travel in the same query string and are read separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub cursor: Option<String>,
    pub limit: Option<u64>,
}

impl PageParams {
    pub fn cursor(&self) -> Result<Option<Cursor>, ListingError> {
        match self.cursor.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }

    pub fn limit(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor_means_first_page() {
        let params = PageParams {
            cursor: Some(String::new()),
            limit: None,
        };
        assert_eq!(params.cursor().unwrap(), None);
        assert_eq!(params.limit(10), 10);
    }

    #[test]
    fn garbage_cursor_is_a_validation_error() {
        let params = PageParams {
            cursor: Some("zzz".into()),
            limit: Some(5),
        };
        assert!(matches!(params.cursor(), Err(ListingError::Validation(_))));
        assert_eq!(params.limit(10), 5);
    }
}
