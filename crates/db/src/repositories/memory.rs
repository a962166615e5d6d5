use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;

use interiq_core::domain::lead::{Lead, LeadId};

use super::{LeadPage, LeadQuery, LeadRepository, RepositoryError};

pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;

#[derive(Default)]
struct LeadState {
    leads: HashMap<String, Lead>,
    arrival: VecDeque<String>,
}

/// Keyed lead store bounded by `capacity`; the earliest-saved lead is evicted
/// once the bound is reached.
pub struct InMemoryLeadRepository {
    capacity: usize,
    state: RwLock<LeadState>,
}

impl Default for InMemoryLeadRepository {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }
}

impl InMemoryLeadRepository {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), state: RwLock::new(LeadState::default()) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.leads.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn save(&self, lead: Lead) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let key = lead.id.0.clone();

        if !state.leads.contains_key(&key) {
            while state.leads.len() >= self.capacity {
                let Some(oldest) = state.arrival.pop_front() else {
                    break;
                };
                state.leads.remove(&oldest);
            }
            state.arrival.push_back(key.clone());
        }

        state.leads.insert(key, lead);
        Ok(())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.leads.get(&id.0).cloned())
    }

    async fn list(&self, query: &LeadQuery) -> Result<LeadPage, RepositoryError> {
        let state = self.state.read().await;
        let mut matching: Vec<&Lead> = state
            .arrival
            .iter()
            .rev()
            .filter_map(|key| state.leads.get(key))
            .filter(|lead| query.category.map_or(true, |category| lead.lead_category == category))
            .collect();
        matching.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        let total = matching.len() as u64;
        let leads = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(LeadPage::new(leads, total, query))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn storage_kind(&self) -> &'static str {
        "memory"
    }
}
