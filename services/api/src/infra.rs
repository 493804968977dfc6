use founder_ai::interview::{
    CatalogOutline, EnrichmentError, EnrichmentRequest, EnrichmentSink, ProfileRecord,
    ProfileRepository, RepositoryError, SessionId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) outline: Arc<CatalogOutline>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<SessionId, ProfileRecord>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn upsert(&self, record: ProfileRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn completed(&self, limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        let mut records: Vec<ProfileRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEnrichmentSink {
    requests: Arc<Mutex<Vec<EnrichmentRequest>>>,
}

impl EnrichmentSink for InMemoryEnrichmentSink {
    fn publish(&self, request: EnrichmentRequest) -> Result<(), EnrichmentError> {
        let mut guard = self.requests.lock().expect("enrichment mutex poisoned");
        guard.push(request);
        Ok(())
    }
}

impl InMemoryEnrichmentSink {
    pub(crate) fn requests(&self) -> Vec<EnrichmentRequest> {
        self.requests.lock().expect("enrichment mutex poisoned").clone()
    }
}
