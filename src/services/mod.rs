/// Business logic services layer
use std::sync::Arc;

use tracing::info;

use crate::domain::{Body, BodyQuery, Page};
use crate::errors::ApiResult;
use crate::pagination::{self, PageLinks};
use crate::query::FilterSet;
use crate::repo::BodyRepository;

/// Body catalogue listing service
pub struct BodyService {
    repo: Arc<dyn BodyRepository>,
    links: PageLinks,
}

impl BodyService {
    pub fn new(repo: Arc<dyn BodyRepository>, links: PageLinks) -> Self {
        Self { repo, links }
    }

    /// First page of bodies matching `query`
    pub async fn list_first_page(&self, query: &BodyQuery) -> ApiResult<Page<Body>> {
        self.list_page(query, 1).await
    }

    /// Page `page` (1-based) of bodies matching `query`
    pub async fn list_page(&self, query: &BodyQuery, page: i64) -> ApiResult<Page<Body>> {
        let limit = query.limit();
        let filters = FilterSet::from_query(query);

        let count = self.repo.count(&filters).await?;
        let bodies = self
            .repo
            .fetch_page(&filters, pagination::skip(page, limit), limit)
            .await?;

        info!(
            page,
            limit,
            count,
            filters = filters.predicates().len(),
            "listed bodies"
        );

        self.links
            .paginate(bodies, count, page, limit, &query.query_pairs())
    }
}
