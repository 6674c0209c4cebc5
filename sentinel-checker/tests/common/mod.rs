//! Shared fixtures: a scripted in-memory ledger and a tracing event recorder.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use sentinel_checker::{LedgerClient, LedgerError};
use sentinel_core::{Digest, Root, VerifiedItem};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory ledger whose answers are scripted per test.
///
/// Root responses are taken from the script first; once it is exhausted the
/// ledger reports `entries` committed entries.
pub struct ScriptedLedger {
    entries: u64,
    roots: Mutex<VecDeque<Result<Root, LedgerError>>>,
    failing: Mutex<BTreeSet<u64>>,
    unreachable: BTreeSet<u64>,
    misrouted: BTreeMap<u64, u64>,
    item_delay: Option<Duration>,
    root_calls: AtomicUsize,
    item_calls: Mutex<Vec<u64>>,
}

impl ScriptedLedger {
    pub fn with_entries(entries: u64) -> Self {
        Self {
            entries,
            roots: Mutex::new(VecDeque::new()),
            failing: Mutex::new(BTreeSet::new()),
            unreachable: BTreeSet::new(),
            misrouted: BTreeMap::new(),
            item_delay: None,
            root_calls: AtomicUsize::new(0),
            item_calls: Mutex::new(Vec::new()),
        }
    }

    /// Indices whose proof does not check out.
    pub fn failing(self, indices: &[u64]) -> Self {
        *lock(&self.failing) = indices.iter().copied().collect();
        self
    }

    /// Indices whose fetch fails in transport.
    pub fn unreachable(mut self, indices: &[u64]) -> Self {
        self.unreachable = indices.iter().copied().collect();
        self
    }

    /// Answer a request for `requested` with the entry at `served`.
    pub fn misroute(mut self, requested: u64, served: u64) -> Self {
        self.misrouted.insert(requested, served);
        self
    }

    /// Hold every item answer for `delay` before replying.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = Some(delay);
        self
    }

    /// Root responses returned before falling back to the steady-state root.
    pub fn script_roots(self, roots: Vec<Result<Root, LedgerError>>) -> Self {
        *lock(&self.roots) = roots.into();
        self
    }

    pub fn set_failing(&self, indices: &[u64]) {
        *lock(&self.failing) = indices.iter().copied().collect();
    }

    pub fn root_calls(&self) -> usize {
        self.root_calls.load(Ordering::SeqCst)
    }

    pub fn item_calls(&self) -> Vec<u64> {
        lock(&self.item_calls).clone()
    }

    pub fn clear_item_calls(&self) {
        lock(&self.item_calls).clear();
    }

    fn steady_root(&self) -> Root {
        if self.entries == 0 {
            return Root::empty();
        }
        match Digest::new(vec![0x5e; 32]) {
            Ok(digest) => Root::new(self.entries - 1, digest),
            Err(e) => panic!("fixture digest rejected: {e}"),
        }
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn current_root(&self) -> Result<Root, LedgerError> {
        self.root_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = lock(&self.roots).pop_front();
        scripted.unwrap_or_else(|| Ok(self.steady_root()))
    }

    async fn verify_item(&self, index: u64) -> Result<VerifiedItem, LedgerError> {
        lock(&self.item_calls).push(index);
        if let Some(delay) = self.item_delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable.contains(&index) {
            return Err(LedgerError::Http(format!("connection reset fetching {index}")));
        }
        let served = self.misrouted.get(&index).copied().unwrap_or(index);
        let verified = !lock(&self.failing).contains(&served);
        Ok(VerifiedItem::new(served, format!("value-{served}").into_bytes(), verified))
    }
}

/// A tracing event reduced to its level and recorded fields.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Layer recording every event it sees.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<CapturedEvent> {
        lock(&self.events).clone()
    }

    /// Events whose message equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| e.message() == message).collect()
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for EventRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        lock(&self.events).push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.fields,
        });
    }
}
