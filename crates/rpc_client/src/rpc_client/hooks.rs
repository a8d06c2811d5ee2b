use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a single RPC round trip, reported to [`RpcClientHooks`].
#[derive(Debug, Clone)]
pub struct RpcRequestOutcome {
    /// Fully qualified method name
    pub method: String,
    /// Wall-clock time spent on the request
    pub elapsed: Duration,
    /// Whether a result was obtained
    pub success: bool,
    /// Timeout configured on the client
    pub timeout: Duration,
    /// JSON-RPC error code, if the node returned one
    pub error_code: Option<i64>,
}

type Observer = Arc<dyn Fn(&RpcRequestOutcome) + Send + Sync>;

/// Observers notified after every request.
#[derive(Clone, Default)]
pub struct RpcClientHooks {
    observers: Vec<Observer>,
}

impl RpcClientHooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    #[must_use]
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&RpcRequestOutcome) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    pub(crate) fn notify(&self, outcome: RpcRequestOutcome) {
        for observer in &self.observers {
            observer(&outcome);
        }
    }
}

impl fmt::Debug for RpcClientHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClientHooks")
            .field("observers", &self.observers.len())
            .finish()
    }
}
