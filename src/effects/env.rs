//! Environments that supply the side effects a session needs.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Capabilities a session effect may use when it runs.
///
/// Recording a history entry is the only effectful step in the calculator:
/// it needs the current time and a fresh identifier. Both come from the
/// environment so tests can substitute deterministic values.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;

    /// A fresh identifier for a history entry.
    fn next_id(&self) -> Uuid;
}

/// Production environment: wall clock and random v4 identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic environment: a frozen clock and sequential identifiers.
///
/// Clones share the same counter, so ids stay unique across clones.
///
/// # Example
///
/// ```rust
/// use keycalc::effects::{Environment, FixedEnv};
/// use uuid::Uuid;
///
/// let env = FixedEnv::default();
/// assert_eq!(env.next_id(), Uuid::from_u128(1));
/// assert_eq!(env.next_id(), Uuid::from_u128(2));
/// assert_eq!(env.now(), env.now());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FixedEnv {
    timestamp: DateTime<Utc>,
    issued: Arc<AtomicU64>,
}

impl FixedEnv {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of identifiers handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Environment for FixedEnv {
    fn now(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn next_id(&self) -> Uuid {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Uuid::from_u128(u128::from(n))
    }
}
