//! Offset/limit list parameters

use serde::Deserialize;

use crate::error::validation::ValidationErrors;

/// Raw query string parameters of list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub offset: i64,
    pub limit: Option<i64>,
}

/// Validated window: `offset >= 0`, `limit > 0` when present.
/// `limit == None` means every remaining row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub offset: i64,
    pub limit: Option<i64>,
}

impl ListParams {
    pub fn validate(self) -> Result<Page, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.offset < 0 {
            errors.add("offset", "must be greater than or equal to 0");
        }
        if matches!(self.limit, Some(limit) if limit <= 0) {
            errors.add("limit", "must be greater than 0");
        }
        errors.into_result()?;

        Ok(Page {
            offset: self.offset,
            limit: self.limit,
        })
    }
}

impl Page {
    /// Apply the window to an in-memory sequence
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let iter = items.iter().skip(offset).cloned();
        match self.limit.and_then(|l| usize::try_from(l).ok()) {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = ListParams::default().validate().unwrap();
        assert_eq!(page, Page { offset: 0, limit: None });
    }

    #[test]
    fn test_rejects_negative_offset_and_zero_limit() {
        let err = ListParams {
            offset: -1,
            limit: Some(0),
        }
        .validate()
        .unwrap_err();
        let fields: Vec<&str> = err.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["offset", "limit"]);
    }

    #[test]
    fn test_slice_without_limit_returns_rest() {
        let page = Page { offset: 2, limit: None };
        assert_eq!(page.slice(&[1, 2, 3, 4]), vec![3, 4]);

        let page = Page { offset: 1, limit: Some(2) };
        assert_eq!(page.slice(&[1, 2, 3, 4]), vec![2, 3]);

        let page = Page { offset: 10, limit: Some(2) };
        assert!(page.slice(&[1, 2, 3]).is_empty());
    }
}
