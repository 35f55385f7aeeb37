/// Page arithmetic and navigation links for paginated listings
use serde::Serialize;
use url::Url;

use crate::domain::Page;
use crate::errors::{ApiError, ApiResult};

/// `ceil(count / limit)`; a non-positive limit means no pages.
pub fn total_pages(count: i64, limit: i64) -> i64 {
    if limit <= 0 || count <= 0 {
        return 0;
    }
    (count - 1) / limit + 1
}

pub fn next_page(current: i64, count: i64, limit: i64) -> Option<i64> {
    if current >= total_pages(count, limit) {
        return None;
    }
    Some(current + 1)
}

pub fn previous_page(current: i64, count: i64, limit: i64) -> Option<i64> {
    if current <= 1 || current - 1 > total_pages(count, limit) {
        return None;
    }
    Some(current - 1)
}

/// Row offset of a page for the fetch query.
pub fn skip(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1)
        .max(0)
        .saturating_mul(limit.max(0))
}

/// Resolves the paginated listing route to absolute URLs.
#[derive(Clone, Debug)]
pub struct PageLinks {
    base: Url,
    route: String,
}

impl PageLinks {
    /// `route` is the path template with a `{page}` placeholder.
    pub fn new(base: Url, route: impl Into<String>) -> Self {
        Self {
            base,
            route: route.into(),
        }
    }

    pub fn url_for(&self, page: i64, params: &[(&str, String)]) -> ApiResult<String> {
        let path = self.route.replace("{page}", &page.to_string());
        let mut url = self
            .base
            .join(&path)
            .map_err(|e| ApiError::Internal(format!("cannot build page URL {path}: {e}")))?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url.into())
    }

    pub fn paginate<T: Serialize>(
        &self,
        results: Vec<T>,
        count: i64,
        current: i64,
        limit: i64,
        params: &[(&str, String)],
    ) -> ApiResult<Page<T>> {
        let link = |page: Option<i64>| page.map(|p| self.url_for(p, params)).transpose();

        Ok(Page {
            count,
            next_page: link(next_page(current, count, limit))?,
            previous_page: link(previous_page(current, count, limit))?,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> PageLinks {
        PageLinks::new(
            Url::parse("https://test").unwrap(),
            "/api/v1/bodies/{page}",
        )
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (count, limit, expected) in [(0, 20, 0), (1, 20, 1), (20, 20, 1), (21, 20, 2), (406, 20, 21)] {
            assert_eq!(total_pages(count, limit), expected, "{count}/{limit}");
        }
    }

    #[test]
    fn test_total_pages_huge_limit() {
        assert_eq!(total_pages(27, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
        assert_eq!(next_page(1, 27, i64::MAX), None);
        assert_eq!(previous_page(2, 27, i64::MAX), Some(1));
        assert_eq!(previous_page(i64::MAX, i64::MAX, 1), Some(i64::MAX - 1));
        assert_eq!(skip(i64::MAX, i64::MAX), i64::MAX);
    }

    #[test]
    fn test_total_pages_zero_limit() {
        assert_eq!(total_pages(406, 0), 0);
        assert_eq!(total_pages(406, -5), 0);
    }

    #[test]
    fn test_next_page() {
        assert_eq!(next_page(1, 406, 20), Some(2));
        assert_eq!(next_page(20, 406, 20), Some(21));
        assert_eq!(next_page(21, 406, 20), None);
        assert_eq!(next_page(99, 406, 20), None);
        assert_eq!(next_page(1, 0, 20), None);
        assert_eq!(next_page(1, 406, 0), None);
    }

    #[test]
    fn test_previous_page() {
        assert_eq!(previous_page(1, 406, 20), None);
        assert_eq!(previous_page(2, 406, 20), Some(1));
        assert_eq!(previous_page(22, 406, 20), Some(21));
        assert_eq!(previous_page(23, 406, 20), None);
        assert_eq!(previous_page(0, 406, 20), None);
    }

    #[test]
    fn test_skip() {
        assert_eq!(skip(1, 20), 0);
        assert_eq!(skip(3, 20), 40);
        assert_eq!(skip(0, 20), 0);
        assert_eq!(skip(3, -1), 0);
    }

    #[test]
    fn test_url_for_appends_params_in_order() {
        let params = vec![
            ("limit", "20".to_string()),
            ("ra", "2.294522".to_string()),
            ("name", "β Cas".to_string()),
        ];
        assert_eq!(
            links().url_for(2, &params).unwrap(),
            "https://test/api/v1/bodies/2?limit=20&ra=2.294522&name=%CE%B2+Cas"
        );
    }

    #[test]
    fn test_paginate_first_page() {
        let page = links()
            .paginate(vec![1, 2], 406, 1, 20, &[("limit", "20".to_string())])
            .unwrap();
        assert_eq!(page.count, 406);
        assert_eq!(
            page.next_page.as_deref(),
            Some("https://test/api/v1/bodies/2?limit=20")
        );
        assert_eq!(page.previous_page, None);
        assert_eq!(page.results, vec![1, 2]);
    }

    #[test]
    fn test_paginate_single_page_has_no_links() {
        let page = links()
            .paginate(vec!["a"], 3, 1, 20, &[("limit", "20".to_string())])
            .unwrap();
        assert_eq!(page.next_page, None);
        assert_eq!(page.previous_page, None);
    }
}
