// In-process vitals source for local runs and tests
use crate::application::vitals_source::{Subscription, UpdateCallback, VitalsSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Registry {
    values: HashMap<String, f64>,
    listeners: HashMap<String, Vec<(u64, UpdateCallback)>>,
    next_id: u64,
}

/// Stores the latest value per path and notifies listeners synchronously on
/// every write.
#[derive(Clone, Default)]
pub struct InMemoryVitalsSource {
    registry: Arc<Mutex<Registry>>,
}

impl InMemoryVitalsSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn value(&self, path: &str) -> Option<f64> {
        self.registry.lock().values.get(path).copied()
    }

    #[cfg(test)]
    pub fn listener_count(&self, path: &str) -> usize {
        self.registry
            .lock()
            .listeners
            .get(path)
            .map(|l| l.len())
            .unwrap_or(0)
    }

    /// Clear a path so listeners observe a missing value.
    #[cfg(test)]
    pub fn remove(&self, path: &str) {
        let listeners = {
            let mut registry = self.registry.lock();
            registry.values.remove(path);
            Self::listeners_for(&registry, path)
        };
        for listener in listeners {
            listener(None);
        }
    }

    fn listeners_for(registry: &Registry, path: &str) -> Vec<UpdateCallback> {
        registry
            .listeners
            .get(path)
            .map(|l| l.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VitalsSource for InMemoryVitalsSource {
    fn subscribe(&self, path: &str, on_update: UpdateCallback) -> anyhow::Result<Subscription> {
        let (id, current) = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .listeners
                .entry(path.to_string())
                .or_default()
                .push((id, on_update.clone()));
            (id, registry.values.get(path).copied())
        };

        // Listeners run outside the registry lock so they may write back.
        on_update(current);

        let registry = Arc::downgrade(&self.registry);
        let key = path.to_string();
        Ok(Subscription::new(path, move || {
            if let Some(registry) = registry.upgrade() {
                let mut registry = registry.lock();
                if let Some(listeners) = registry.listeners.get_mut(&key) {
                    listeners.retain(|(listener_id, _)| *listener_id != id);
                    if listeners.is_empty() {
                        registry.listeners.remove(&key);
                    }
                }
            }
        }))
    }

    async fn write(&self, path: &str, value: f64) -> anyhow::Result<()> {
        let listeners = {
            let mut registry = self.registry.lock();
            registry.values.insert(path.to_string(), value);
            Self::listeners_for(&registry, path)
        };

        tracing::debug!("Wrote {} = {} ({} listeners)", path, value, listeners.len());
        for listener in listeners {
            listener(Some(value));
        }
        Ok(())
    }
}
