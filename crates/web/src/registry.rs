use fundview_core::client::RecommendationApi;
use fundview_core::view::RecommendationView;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const DEFAULT_MAX_VIEWS: usize = 1024;

/// Live views keyed by id. Oldest views are evicted once `max_views` is reached.
pub struct ViewRegistry {
    api: Arc<dyn RecommendationApi>,
    max_views: usize,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    views: HashMap<Uuid, Arc<RecommendationView>>,
    order: VecDeque<Uuid>,
}

impl ViewRegistry {
    pub fn new(api: Arc<dyn RecommendationApi>, max_views: usize) -> Self {
        Self {
            api,
            max_views: max_views.max(1),
            inner: RwLock::new(Inner::default()),
        }
    }

    pub async fn create(&self) -> (Uuid, Arc<RecommendationView>) {
        let id = Uuid::new_v4();
        let view = Arc::new(RecommendationView::new(self.api.clone()));

        let mut inner = self.inner.write().await;
        while inner.order.len() >= self.max_views {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.views.remove(&oldest);
            tracing::debug!(view_id = %oldest, "evicted view");
        }
        inner.views.insert(id, view.clone());
        inner.order.push_back(id);
        tracing::debug!(view_id = %id, live = inner.views.len(), "created view");
        (id, view)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<RecommendationView>> {
        self.inner.read().await.views.get(&id).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.views.len()
    }
}
