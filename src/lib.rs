//! Lumetric – client-side analytics instrumentation with identity
//! reconciliation.
//!
//! Lumetric lets an application emit analytics events and maintain a
//! per-user analytics profile even though a stable user identity may become
//! known only after the application has already produced data. Each
//! project-token-scoped [`engine::Tracker`] owns:
//!
//! * two independent identity slots — one correlating events, one
//!   correlating profile mutations — with independent lifecycles,
//! * a persistent set of *super properties* merged into every tracked event
//!   until unregistered or cleared,
//! * a pending profile buffer that absorbs profile `set`/`increment` calls
//!   made before a profile identity exists and replays them exactly once
//!   when the identity is established (including across process restarts).
//!
//! Every mutation is durably persisted before the call returns, so an
//! instance reconstructs its exact state on the next start. Outgoing records
//! are handed to an [`emit::MessageSink`] fire-and-forget; transport,
//! batching and retry live on the other side of that boundary.
//!
//! ## Modules
//! * [`engine`] – keepers for identities, super properties and the pending
//!   buffer, the [`engine::Tracker`] / [`engine::People`] public surface and
//!   the host-owned [`engine::Registry`].
//! * [`value`] – the closed [`value::Value`] property type and the
//!   [`value::Properties`] bag used everywhere.
//! * [`persist`] – SQLite persistence with per-token namespaces and atomic
//!   multi-key commits.
//! * [`emit`] – the message emission boundary (event records, profile
//!   mutations, sinks).
//! * [`config`] – library configuration and host-supplied device metadata.
//!
//! ## Quick Start
//! ```
//! use lumetric::config::{DeviceInfo, TrackerConfig};
//! use lumetric::emit::CapturingSink;
//! use lumetric::engine::Registry;
//! use lumetric::value::{Properties, Value};
//!
//! let sink = CapturingSink::new();
//! let registry = Registry::new(TrackerConfig::default(), DeviceInfo::default(), sink.clone());
//! let tracker = registry.instance("demo-token").unwrap();
//!
//! let mut props = Properties::default();
//! props.insert("plan".to_owned(), Value::from("pro"));
//! tracker.register_super_properties(props);
//! tracker.identify("user-42");
//! tracker.track("Signed Up", None);
//! assert_eq!(sink.events.lock().unwrap().len(), 1);
//! ```
//!
//! ## Status & Roadmap
//! The persisted key layout is stable; the sink trait may still grow
//! channel-level hooks as transports need them. Contributions around
//! alternative persistence backends and documentation are welcome.

pub mod config;
pub mod emit;
pub mod engine;
pub mod error;
pub mod persist;
pub mod value;

// Lock acquisition that survives a poisoned mutex: a panicking writer must
// not take the whole instance down with it.
pub(crate) fn relock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
