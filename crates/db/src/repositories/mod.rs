use async_trait::async_trait;
use thiserror::Error;

use interiq_core::domain::lead::{Lead, LeadId};
use interiq_core::errors::ApplicationError;
use interiq_core::scoring::LeadCategory;

pub mod lead;
pub mod memory;

pub use lead::SqlLeadRepository;
pub use memory::InMemoryLeadRepository;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

/// Filter and page selection for lead listings. Pages are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadQuery {
    pub category: Option<LeadCategory>,
    pub page: u32,
    pub limit: u32,
}

impl Default for LeadQuery {
    fn default() -> Self {
        Self { category: None, page: 1, limit: DEFAULT_PAGE_SIZE }
    }
}

impl LeadQuery {
    pub fn new(category: Option<LeadCategory>, page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            category,
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl LeadPage {
    pub fn new(leads: Vec<Lead>, total: u64, query: &LeadQuery) -> Self {
        let pages = total.div_ceil(u64::from(query.limit));
        Self { leads, total, page: query.page, pages }
    }
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn save(&self, lead: Lead) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
    /// Newest leads first.
    async fn list(&self, query: &LeadQuery) -> Result<LeadPage, RepositoryError>;
    async fn ping(&self) -> Result<(), RepositoryError>;
    fn storage_kind(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use interiq_core::scoring::LeadCategory;

    use super::{LeadPage, LeadQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

    #[test]
    fn query_normalizes_page_and_limit() {
        let query = LeadQuery::new(Some(LeadCategory::High), Some(0), Some(0));
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 1);

        let defaults = LeadQuery::new(None, None, None);
        assert_eq!(defaults, LeadQuery::default());
        assert_eq!(defaults.limit, DEFAULT_PAGE_SIZE);

        let capped = LeadQuery::new(None, Some(3), Some(10_000));
        assert_eq!(capped.limit, MAX_PAGE_SIZE);
        assert_eq!(capped.offset(), 200);
    }

    #[test]
    fn page_count_rounds_up() {
        let query = LeadQuery::new(None, Some(2), Some(20));
        assert_eq!(LeadPage::new(Vec::new(), 41, &query).pages, 3);
        assert_eq!(LeadPage::new(Vec::new(), 40, &query).pages, 2);
        assert_eq!(LeadPage::new(Vec::new(), 0, &query).pages, 0);
    }
}
