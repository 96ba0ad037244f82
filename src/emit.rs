//! Message emission boundary for outgoing analytics records.
//!
//! The engine builds [`EventRecord`]s and [`ProfileMutation`]s and hands them
//! to a [`MessageSink`], fire-and-forget. Delivery, batching and retry live
//! on the other side of this boundary; the engine never inspects delivery
//! results. The sink exposes independent submit triggers for the event
//! channel and the profile channel so a host can push either queue on its
//! own schedule.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use serde_json::json;

use crate::relock;
use crate::value::{Properties, Value};

/// What a profile mutation does to the target profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    Set,
    Increment,
    Union,
    Delete,
}

impl ProfileAction {
    /// The wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileAction::Set => "$set",
            ProfileAction::Increment => "$add",
            ProfileAction::Union => "$union",
            ProfileAction::Delete => "$delete",
        }
    }
}

/// A tracked event with its fully merged property bag.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub event: String,
    pub properties: Properties,
}

impl EventRecord {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "event": self.event,
            "properties": serde_json::Value::from(&Value::Map(self.properties.clone())),
        })
    }
}

/// A change to a per-identity analytics profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileMutation {
    pub action: ProfileAction,
    pub target: String,
    pub payload: Value,
    pub token: String,
    /// Milliseconds since the unix epoch.
    pub time: i64,
}

impl ProfileMutation {
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(self.action.as_str().to_owned(), serde_json::Value::from(&self.payload));
        object.insert("$token".to_owned(), self.token.clone().into());
        object.insert("$distinct_id".to_owned(), self.target.clone().into());
        object.insert("$time".to_owned(), self.time.into());
        serde_json::Value::Object(object)
    }
}

/// Accepts outgoing records from the engine.
///
/// Hand-off must be synchronous and non-blocking on network I/O. The default
/// submit triggers do nothing; implementations that queue override them.
pub trait MessageSink: Send + Sync {
    fn event_record(&self, record: EventRecord);
    fn profile_mutation(&self, mutation: ProfileMutation);
    fn submit_events(&self) {}
    fn submit_people(&self) {}
}

/// A drained batch, one channel at a time.
#[derive(Debug)]
pub enum Batch {
    Events(Vec<EventRecord>),
    People(Vec<ProfileMutation>),
}

/// The default sink: two in-memory queues draining into an mpsc channel on
/// submit. The host consumes the receiving end and owns the transport.
pub struct QueuedMessages {
    events: Mutex<Vec<EventRecord>>,
    people: Mutex<Vec<ProfileMutation>>,
    outbox: Mutex<Sender<Batch>>,
}

impl QueuedMessages {
    pub fn new() -> (Arc<QueuedMessages>, Receiver<Batch>) {
        let (tx, rx) = mpsc::channel();
        let queued = QueuedMessages {
            events: Mutex::new(Vec::new()),
            people: Mutex::new(Vec::new()),
            outbox: Mutex::new(tx),
        };
        (Arc::new(queued), rx)
    }
}

impl MessageSink for QueuedMessages {
    fn event_record(&self, record: EventRecord) {
        relock(&self.events).push(record);
    }
    fn profile_mutation(&self, mutation: ProfileMutation) {
        relock(&self.people).push(mutation);
    }
    fn submit_events(&self) {
        let batch: Vec<EventRecord> = relock(&self.events).drain(..).collect();
        if !batch.is_empty() {
            let _ = relock(&self.outbox).send(Batch::Events(batch));
        }
    }
    fn submit_people(&self) {
        let batch: Vec<ProfileMutation> = relock(&self.people).drain(..).collect();
        if !batch.is_empty() {
            let _ = relock(&self.outbox).send(Batch::People(batch));
        }
    }
}

/// A sink that keeps everything it is handed. Intended for test harnesses.
#[derive(Default)]
pub struct CapturingSink {
    pub events: Mutex<Vec<EventRecord>>,
    pub people: Mutex<Vec<ProfileMutation>>,
    pub event_submits: AtomicUsize,
    pub people_submits: AtomicUsize,
}

impl CapturingSink {
    pub fn new() -> Arc<CapturingSink> {
        Arc::new(CapturingSink::default())
    }
}

impl MessageSink for CapturingSink {
    fn event_record(&self, record: EventRecord) {
        relock(&self.events).push(record);
    }
    fn profile_mutation(&self, mutation: ProfileMutation) {
        relock(&self.people).push(mutation);
    }
    fn submit_events(&self) {
        self.event_submits.fetch_add(1, Ordering::SeqCst);
    }
    fn submit_people(&self) {
        self.people_submits.fetch_add(1, Ordering::SeqCst);
    }
}
