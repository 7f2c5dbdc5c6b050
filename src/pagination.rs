//! 1-indexed page slicing for list endpoints.

use crate::config::ApiSection;
use crate::error::ServiceError;
use serde::Serialize;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Build from optional query parameters. `per_page` falls back to the configured
    /// default and is capped at the configured maximum.
    pub fn from_query(
        page: Option<i64>,
        per_page: Option<i64>,
        api: &ApiSection,
    ) -> Result<Self, ServiceError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(ServiceError::BadRequest(format!(
                "page must be at least 1, got {page}"
            )));
        }
        let per_page = per_page.unwrap_or(api.default_per_page as i64);
        if per_page < 1 {
            return Err(ServiceError::BadRequest(format!(
                "per_page must be at least 1, got {per_page}"
            )));
        }
        Ok(Self {
            page: page as usize,
            per_page: (per_page as usize).min(api.max_per_page),
        })
    }
}

/// One page of results, in the shape returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    pub current_page: usize,
    pub per_page: usize,
    pub total_count: usize,
}

/// Slice `rows` (already in display order) into the requested page.
///
/// Page 1 always exists, even when empty. Any later page past the end is
/// [`ServiceError::PageOutOfRange`].
pub fn paginate<T, I>(rows: I, request: PageRequest) -> Result<Page<T>, ServiceError>
where
    I: ExactSizeIterator<Item = T>,
{
    let total_count = rows.len();
    let total_pages = total_count.div_ceil(request.per_page);
    if request.page > 1 && request.page > total_pages {
        return Err(ServiceError::PageOutOfRange { page: request.page });
    }

    let items = rows
        .skip((request.page - 1) * request.per_page)
        .take(request.per_page)
        .collect();

    Ok(Page {
        items,
        total_pages,
        current_page: request.page,
        per_page: request.per_page,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: usize, per_page: usize) -> PageRequest {
        PageRequest { page, per_page }
    }

    #[test]
    fn test_second_page_of_twelve() {
        let page = paginate(1..13, request(2, 5)).unwrap();
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn test_last_page_is_short() {
        let page = paginate(1..13, request(3, 5)).unwrap();
        assert_eq!(page.items, vec![11, 12]);
    }

    #[test]
    fn test_empty_table() {
        let page = paginate(std::iter::empty::<u32>(), request(1, 10)).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(
            paginate(std::iter::empty::<u32>(), request(2, 10)),
            Err(ServiceError::PageOutOfRange { page: 2 })
        );
    }

    #[test]
    fn test_past_the_end() {
        assert_eq!(
            paginate(1..13, request(4, 5)),
            Err(ServiceError::PageOutOfRange { page: 4 })
        );
    }

    #[test]
    fn test_from_query() {
        let api = ApiSection::default();
        assert_eq!(
            PageRequest::from_query(None, None, &api).unwrap(),
            request(1, 10)
        );
        assert_eq!(
            PageRequest::from_query(Some(3), Some(1000), &api).unwrap(),
            request(3, 100)
        );
        assert!(matches!(
            PageRequest::from_query(Some(0), None, &api),
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            PageRequest::from_query(None, Some(-2), &api),
            Err(ServiceError::BadRequest(_))
        ));
    }
}
