//! In-memory body repository for tests and local development.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::BodyRepository;
use crate::domain::{Body, NewBody};
use crate::errors::ApiResult;
use crate::query::{order, FilterSet};

#[derive(Default)]
pub struct MemoryBodyRepo {
    bodies: RwLock<Vec<Body>>,
}

impl MemoryBodyRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.read().is_empty()
    }
}

#[async_trait]
impl BodyRepository for MemoryBodyRepo {
    async fn count(&self, filters: &FilterSet) -> ApiResult<i64> {
        let bodies = self.bodies.read();
        Ok(bodies.iter().filter(|b| filters.matches(b)).count() as i64)
    }

    async fn fetch_page(
        &self,
        filters: &FilterSet,
        skip: i64,
        limit: i64,
    ) -> ApiResult<Vec<Body>> {
        let mut matching: Vec<Body> = self
            .bodies
            .read()
            .iter()
            .filter(|b| filters.matches(b))
            .cloned()
            .collect();

        matching.sort_by(order::compare);

        Ok(matching
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn create(&self, body: NewBody) -> ApiResult<Body> {
        let created = body.into_body(Uuid::new_v4());
        self.bodies.write().push(created.clone());
        Ok(created)
    }

    async fn delete_all(&self) -> ApiResult<u64> {
        let mut bodies = self.bodies.write();
        let removed = bodies.len() as u64;
        bodies.clear();
        Ok(removed)
    }
}
