// Monitor service - Wires the vitals source into the monitoring session
use crate::application::error::MonitorError;
use crate::application::monitoring_session::{MonitoringSession, VitalUpdate};
use crate::application::vitals_source::{Subscription, UpdateCallback, VitalsSource};
use crate::domain::classifier::StatusLabel;
use crate::domain::dashboard::{ConnectionStatus, Dashboard};
use crate::domain::vitals::{Sample, SignalKind};
use crate::infrastructure::config::SignalPaths;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

const UPDATE_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct MonitorService {
    source: Arc<dyn VitalsSource>,
    session: Arc<Mutex<MonitoringSession>>,
    paths: SignalPaths,
    subscriptions: Arc<Mutex<Vec<Subscription>>>,
    updates: broadcast::Sender<VitalUpdate>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl MonitorService {
    pub fn new(source: Arc<dyn VitalsSource>, session: MonitoringSession, paths: SignalPaths) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let (shutdown, _) = watch::channel(false);
        Self {
            source,
            session: Arc::new(Mutex::new(session)),
            paths,
            subscriptions: Arc::new(Mutex::new(Vec::new())),
            updates,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Register one listener per signal kind.
    pub fn start(&self) -> Result<(), MonitorError> {
        let mut subscriptions = self.subscriptions.lock();
        if self.session.lock().is_closed() {
            return Err(MonitorError::SessionClosed);
        }
        if !subscriptions.is_empty() {
            return Err(MonitorError::AlreadyStarted);
        }

        for kind in SignalKind::ALL {
            let path = self.paths.path(kind).to_string();
            match self.source.subscribe(&path, self.listener(kind)) {
                Ok(subscription) => {
                    tracing::debug!("Listening on {} for {}", subscription.path(), kind.slug());
                    subscriptions.push(subscription);
                }
                Err(source) => {
                    // Dropping the handles tears down the listeners already registered.
                    subscriptions.clear();
                    return Err(MonitorError::Source { path, source });
                }
            }
        }

        tracing::info!(
            "Monitoring started on paths {}, {}, {}",
            self.paths.heart_rate,
            self.paths.oxygen_saturation,
            self.paths.temperature
        );
        Ok(())
    }

    /// End the session: no buffer mutation happens after this returns, and
    /// streams watching `subscribe_shutdown` are told to end.
    pub fn stop(&self) {
        self.session.lock().close();
        self.shutdown.send_replace(true);

        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        let count = subscriptions.len();
        for subscription in subscriptions {
            subscription.unsubscribe();
        }

        tracing::info!("Monitoring stopped, {} listeners removed", count);
    }

    fn listener(&self, kind: SignalKind) -> UpdateCallback {
        let session = self.session.clone();
        let updates = self.updates.clone();
        Arc::new(move |value| {
            let update = session.lock().on_sample(kind, value, Utc::now());
            if let Some(update) = update {
                // No receivers is fine: nobody is watching the stream.
                let _ = updates.send(update);
            }
        })
    }

    pub fn subscribe_updates(&self) -> broadcast::Receiver<VitalUpdate> {
        self.updates.subscribe()
    }

    /// Turns true once `stop` has run.
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    pub fn snapshot(&self) -> Dashboard {
        self.session.lock().dashboard()
    }

    pub fn history(&self, kind: SignalKind) -> Vec<Sample> {
        self.session.lock().current(kind)
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.session.lock().connection()
    }

    pub fn active_listeners(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn resolve_kind(&self, name: &str) -> Option<SignalKind> {
        self.paths.resolve(name)
    }

    /// Classify an arbitrary kind name; unrecognized names are `Unknown`.
    pub fn classify(&self, kind: &str, value: f64) -> StatusLabel {
        let kind = self.paths.resolve(kind);
        self.session.lock().classifier().classify_raw(kind, value)
    }

    pub async fn write(&self, kind: SignalKind, value: f64) -> Result<(), MonitorError> {
        let path = self.paths.path(kind);
        self.source
            .write(path, value)
            .await
            .map_err(|source| MonitorError::Source {
                path: path.to_string(),
                source,
            })
    }
}
