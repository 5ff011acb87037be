use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Every list page shows this many rows.
pub const PAGE_SIZE: i64 = 3;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Resolved position of one page within `count` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
}

impl Paginator {
    /// Accepts a 1-based page number or `last`. An empty result still has
    /// page 1.
    pub fn resolve(query: &PageQuery, count: i64) -> Result<Self, AppError> {
        let num_pages = if count == 0 {
            1
        } else {
            (count + PAGE_SIZE - 1) / PAGE_SIZE
        };

        let number = match query.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some("last") => num_pages,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::NotFound(format!("Invalid page '{}'", raw)))?,
        };

        if number < 1 || number > num_pages {
            return Err(AppError::NotFound(format!("Page {} contains no results", number)));
        }

        Ok(Self {
            number,
            num_pages,
            count,
        })
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * PAGE_SIZE
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            has_next: self.number < self.num_pages,
            has_previous: self.number > 1,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: &str) -> PageQuery {
        PageQuery {
            page: Some(page.to_string()),
        }
    }

    #[test]
    fn test_empty_result_has_first_page() {
        let paginator = Paginator::resolve(&PageQuery::default(), 0).unwrap();
        assert_eq!(paginator.number, 1);
        assert_eq!(paginator.num_pages, 1);
        assert_eq!(paginator.offset(), 0);
    }

    #[test]
    fn test_pages_hold_three_rows() {
        let paginator = Paginator::resolve(&query("2"), 7).unwrap();
        assert_eq!(paginator.num_pages, 3);
        assert_eq!(paginator.offset(), 3);
        assert_eq!(paginator.limit(), 3);

        let page = paginator.into_page(vec![4, 5, 6]);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn test_last_resolves_to_final_page() {
        let paginator = Paginator::resolve(&query("last"), 6).unwrap();
        assert_eq!(paginator.number, 2);
        assert!(!paginator.into_page(Vec::<i64>::new()).has_next);
    }

    #[test]
    fn test_out_of_range_and_garbage_are_not_found() {
        assert!(matches!(
            Paginator::resolve(&query("3"), 6),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            Paginator::resolve(&query("0"), 6),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            Paginator::resolve(&query("abc"), 6),
            Err(AppError::NotFound(_))
        ));
    }
}
