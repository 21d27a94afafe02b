// Source trait for live vital sign values
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Invoked with the new value at a path, or `None` when the path holds no
/// numeric value.
pub type UpdateCallback = Arc<dyn Fn(Option<f64>) + Send + Sync>;

/// Handle for a registered listener. Unsubscribes when dropped.
pub struct Subscription {
    path: String,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(path: impl Into<String>, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            path: path.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
            tracing::debug!("Unsubscribed from {}", self.path);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[async_trait]
pub trait VitalsSource: Send + Sync {
    /// Register a listener for a path. The listener fires for every change,
    /// starting with the value present at subscription time.
    fn subscribe(&self, path: &str, on_update: UpdateCallback) -> anyhow::Result<Subscription>;

    /// Write a value to a path (test and simulation use only)
    async fn write(&self, path: &str, value: f64) -> anyhow::Result<()>;
}
