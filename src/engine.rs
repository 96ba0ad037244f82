use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// used for event and profile mutation timestamps
use chrono::Utc;
// the pending record persists as one JSON blob
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::{DeviceInfo, TrackerConfig};
use crate::emit::{EventRecord, MessageSink, ProfileAction, ProfileMutation};
use crate::error::Result;
use crate::persist::{self, Edit, Persistor};
use crate::relock;
use crate::value::{Increments, OtherHasher, Properties, Value, retain_encodable};

/// Sentinel distinct id used when neither an events identity nor a device
/// fallback id is known.
pub const UNKNOWN: &str = "UNKNOWN";

// ------------- Super properties -------------
/// Owns the properties merged into every tracked event. Mutations happen
/// through the operations below and nowhere else; the owning [`Core`]
/// persists the full store after each one.
#[derive(Debug, Default)]
pub struct SuperPropertyKeeper {
    kept: Properties,
}

impl SuperPropertyKeeper {
    pub fn new() -> Self {
        Self {
            kept: Properties::default(),
        }
    }
    fn from_blob(blob: &str) -> Result<Self> {
        Ok(Self {
            kept: serde_json::from_str(blob)?,
        })
    }
    fn to_blob(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.kept)?)
    }
    /// Upserts every key, overwriting existing values. Last call wins.
    pub fn register_all(&mut self, mut props: Properties) {
        retain_encodable(&mut props);
        for (key, value) in props {
            self.kept.insert(key, value);
        }
    }
    /// Upserts only keys not already present. Existing keys are untouched.
    pub fn register_all_once(&mut self, mut props: Properties) {
        retain_encodable(&mut props);
        for (key, value) in props {
            self.kept.entry(key).or_insert(value);
        }
    }
    pub fn unregister(&mut self, key: &str) {
        self.kept.remove(key);
    }
    pub fn clear_all(&mut self) {
        self.kept.clear();
    }
    pub fn snapshot(&self) -> Properties {
        self.kept.clone()
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

// ------------- Pending profile record -------------
/// Profile mutations buffered while no profile identity exists. Two submaps:
/// absolute assignments (last write per key wins) and accumulating
/// increments. Serialized as `{"set": {...}, "add": {...}}`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingProfileRecord {
    #[serde(rename = "set", default)]
    sets: Properties,
    #[serde(rename = "add", default)]
    adds: Increments,
}

impl PendingProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }
    fn from_blob(blob: &str) -> Result<Self> {
        Ok(serde_json::from_str(blob)?)
    }
    fn to_blob(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
    /// Upserts each key into the set submap. A set is an absolute
    /// assignment, so it also cancels any pending accumulator for the same
    /// key; replaying the older increment after the set would resurrect
    /// state the caller overwrote.
    pub fn buffer_set(&mut self, props: Properties) {
        for (key, value) in props {
            self.adds.remove(&key);
            self.sets.insert(key, value);
        }
    }
    /// Adds each amount to the existing accumulator, starting from zero.
    /// The set submap is untouched.
    pub fn buffer_increment(&mut self, amounts: Increments) {
        for (key, amount) in amounts {
            *self.adds.entry(key).or_insert(0) += amount;
        }
    }
    pub fn sets(&self) -> &Properties {
        &self.sets
    }
    pub fn adds(&self) -> &Increments {
        &self.adds
    }
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.adds.is_empty()
    }
}

// ------------- Identity -------------
/// The profile slot. A non-empty pending record can only exist while the
/// identity is unset; this variant makes the contrary state unrepresentable.
#[derive(Debug)]
pub enum ProfileState {
    NoIdentity(PendingProfileRecord),
    HasIdentity(String),
}

/// Holds the two identity slots. Their lifecycles are independent; either
/// may be set without the other.
#[derive(Debug)]
pub struct IdentityKeeper {
    events: Option<String>,
    profile: ProfileState,
}

impl IdentityKeeper {
    pub fn new() -> Self {
        Self {
            events: None,
            profile: ProfileState::NoIdentity(PendingProfileRecord::new()),
        }
    }
    fn restored(events: Option<String>, pending: PendingProfileRecord) -> Self {
        Self {
            events,
            profile: ProfileState::NoIdentity(pending),
        }
    }
    pub fn events_identity(&self) -> Option<&str> {
        self.events.as_deref()
    }
    pub fn set_events_identity(&mut self, distinct_id: String) {
        self.events = Some(distinct_id);
    }
    pub fn people_identity(&self) -> Option<&str> {
        match &self.profile {
            ProfileState::HasIdentity(distinct_id) => Some(distinct_id),
            ProfileState::NoIdentity(_) => None,
        }
    }
    fn pending(&self) -> Option<&PendingProfileRecord> {
        match &self.profile {
            ProfileState::NoIdentity(record) => Some(record),
            ProfileState::HasIdentity(_) => None,
        }
    }
    fn pending_mut(&mut self) -> Option<&mut PendingProfileRecord> {
        match &mut self.profile {
            ProfileState::NoIdentity(record) => Some(record),
            ProfileState::HasIdentity(_) => None,
        }
    }
    /// The one controlled transition of the profile slot. Returns the
    /// buffered record exactly when this call moved the slot from unset to
    /// set with mutations waiting, which is the caller's cue to flush.
    fn establish_people_identity(&mut self, distinct_id: String) -> Option<PendingProfileRecord> {
        match &mut self.profile {
            ProfileState::HasIdentity(current) => {
                *current = distinct_id;
                None
            }
            ProfileState::NoIdentity(record) => {
                let pending = std::mem::take(record);
                self.profile = ProfileState::HasIdentity(distinct_id);
                if pending.is_empty() { None } else { Some(pending) }
            }
        }
    }
}

// ------------- Core -------------
// Everything a mutating operation touches lives behind one mutex: every
// mutation is followed by a blocking durable write, and a flush can run
// inline from within an identity write.
struct Core {
    token: String,
    library_tag: String,
    device: DeviceInfo,
    identities: IdentityKeeper,
    super_properties: SuperPropertyKeeper,
    persistor: Persistor,
}

fn note_persist_failure(result: Result<()>) {
    if let Err(err) = result {
        error!(%err, "durable write failed, continuing with in-memory state");
    }
}

impl Core {
    /// Restores prior state from the persistor. The rehydrated profile
    /// identity is handed back separately so the caller can run it through
    /// the regular transition, which performs the construction-time flush.
    fn restore(
        token: String,
        library_tag: String,
        device: DeviceInfo,
        persistor: Persistor,
    ) -> (Core, Option<String>) {
        let mut core = Core {
            token,
            library_tag,
            device,
            identities: IdentityKeeper::new(),
            super_properties: SuperPropertyKeeper::new(),
            persistor,
        };
        core.read_super_properties();
        let events = core.read_identity(persist::EVENTS_DISTINCT_ID);
        let people = core.read_identity(persist::PEOPLE_DISTINCT_ID);
        let pending = core.read_pending_record();
        core.identities = IdentityKeeper::restored(events, pending);
        (core, people)
    }

    // Unreadable or corrupt stores degrade to their defaults, and the
    // default is persisted back right away.
    fn read_super_properties(&mut self) {
        match self.persistor.get(&self.token, persist::SUPER_PROPERTIES) {
            Ok(None) => {}
            Ok(Some(blob)) => match SuperPropertyKeeper::from_blob(&blob) {
                Ok(keeper) => self.super_properties = keeper,
                Err(err) => {
                    warn!(%err, "stored super properties unreadable, resetting to empty");
                    self.super_properties = SuperPropertyKeeper::new();
                    note_persist_failure(self.persist_super_properties());
                }
            },
            Err(err) => {
                warn!(%err, "could not read super properties, resetting to empty");
                self.super_properties = SuperPropertyKeeper::new();
                note_persist_failure(self.persist_super_properties());
            }
        }
    }

    fn read_identity(&mut self, key: &'static str) -> Option<String> {
        match self.persistor.get(&self.token, key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "could not read identity, falling back to unset");
                note_persist_failure(self.persistor.remove(&self.token, key));
                None
            }
        }
    }

    fn read_pending_record(&mut self) -> PendingProfileRecord {
        let blob = match self.persistor.get(&self.token, persist::WAITING_PEOPLE_RECORD) {
            Ok(Some(blob)) => blob,
            Ok(None) => return PendingProfileRecord::new(),
            Err(err) => {
                warn!(%err, "could not read pending profile record, falling back to empty");
                note_persist_failure(self.persistor.remove(&self.token, persist::WAITING_PEOPLE_RECORD));
                return PendingProfileRecord::new();
            }
        };
        match PendingProfileRecord::from_blob(&blob) {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "stored pending profile record unreadable, resetting to empty");
                note_persist_failure(self.persistor.remove(&self.token, persist::WAITING_PEOPLE_RECORD));
                PendingProfileRecord::new()
            }
        }
    }

    fn persist_super_properties(&mut self) -> Result<()> {
        let blob = self.super_properties.to_blob()?;
        self.persistor.put(&self.token, persist::SUPER_PROPERTIES, &blob)
    }

    /// Stages both identity slots and the pending blob and commits them as
    /// one atomic write. `in_flight` carries a record that has already been
    /// taken out of the state machine but is not flushed yet, so it stays
    /// durable until the flush completes.
    fn persist_identities(&mut self, in_flight: Option<&PendingProfileRecord>) -> Result<()> {
        let mut edits = Vec::new();
        match self.identities.events_identity() {
            Some(distinct_id) => edits.push(Edit::Put(persist::EVENTS_DISTINCT_ID, distinct_id.to_owned())),
            None => edits.push(Edit::Remove(persist::EVENTS_DISTINCT_ID)),
        }
        match self.identities.people_identity() {
            Some(distinct_id) => edits.push(Edit::Put(persist::PEOPLE_DISTINCT_ID, distinct_id.to_owned())),
            None => edits.push(Edit::Remove(persist::PEOPLE_DISTINCT_ID)),
        }
        match in_flight.or_else(|| self.identities.pending()) {
            Some(record) if !record.is_empty() => {
                edits.push(Edit::Put(persist::WAITING_PEOPLE_RECORD, record.to_blob()?));
            }
            _ => edits.push(Edit::Remove(persist::WAITING_PEOPLE_RECORD)),
        }
        self.persistor.commit(&self.token, &edits)
    }

    fn identify_events(&mut self, distinct_id: String) {
        self.identities.set_events_identity(distinct_id);
        note_persist_failure(self.persist_identities(None));
    }

    fn identify_people(&mut self, distinct_id: String, messages: &dyn MessageSink) {
        match self.identities.establish_people_identity(distinct_id) {
            None => note_persist_failure(self.persist_identities(None)),
            Some(record) => {
                // The identity becomes durable first, with the record still
                // on disk; the record clears only once its flush has run.
                note_persist_failure(self.persist_identities(Some(&record)));
                self.flush_pending(record, messages);
            }
        }
    }

    /// Replays a pending record against the now-known profile identity: at
    /// most one set mutation, then at most one increment mutation, then the
    /// empty buffer is persisted. The buffer models "awaiting identity", so
    /// it clears regardless of what the sink does with the messages.
    fn flush_pending(&mut self, record: PendingProfileRecord, messages: &dyn MessageSink) {
        let Some(target) = self.identities.people_identity().map(str::to_owned) else {
            return;
        };
        let PendingProfileRecord { sets, adds } = record;
        if !sets.is_empty() {
            messages.profile_mutation(self.people_message(ProfileAction::Set, &target, Value::Map(sets)));
        }
        if !adds.is_empty() {
            messages.profile_mutation(self.people_message(
                ProfileAction::Increment,
                &target,
                Value::from(&adds),
            ));
        }
        note_persist_failure(self.persist_identities(None));
    }

    fn people_message(&self, action: ProfileAction, target: &str, payload: Value) -> ProfileMutation {
        ProfileMutation {
            action,
            target: target.to_owned(),
            payload,
            token: self.token.clone(),
            time: Utc::now().timestamp_millis(),
        }
    }

    fn track(&self, event_name: &str, call_props: Option<Properties>, messages: &dyn MessageSink) {
        if event_name.is_empty() {
            warn!("dropping event with empty name");
            return;
        }
        debug!(event = event_name, "track");
        let device_fallback = self.device.device_id.as_deref().unwrap_or(UNKNOWN);
        let mut properties = Properties::default();
        // 1. reserved fields, lowest precedence
        properties.insert("token".to_owned(), Value::String(self.token.clone()));
        properties.insert("time".to_owned(), Value::Int(Utc::now().timestamp()));
        properties.insert("distinct_id".to_owned(), Value::String(device_fallback.to_owned()));
        properties.insert(
            "carrier".to_owned(),
            Value::String(self.device.carrier.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
        );
        properties.insert(
            "model".to_owned(),
            Value::String(self.device.model.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
        );
        properties.insert(
            "version".to_owned(),
            Value::String(self.device.os_version.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
        );
        properties.insert("mp_lib".to_owned(), Value::String(self.library_tag.clone()));
        // 2. super properties overwrite same-named reserved fields
        for (key, value) in self.super_properties.snapshot() {
            properties.insert(key, value);
        }
        // 3. per-call properties overwrite same-named super properties
        if let Some(mut props) = call_props {
            retain_encodable(&mut props);
            for (key, value) in props {
                properties.insert(key, value);
            }
        }
        // 4. an established events identity overrides whatever distinct_id
        //    survived the merge
        if let Some(distinct_id) = self.identities.events_identity() {
            properties.insert("distinct_id".to_owned(), Value::String(distinct_id.to_owned()));
        }
        messages.event_record(EventRecord {
            event: event_name.to_owned(),
            properties,
        });
    }

    fn people_set(&mut self, mut props: Properties, messages: &dyn MessageSink) {
        retain_encodable(&mut props);
        match self.identities.people_identity().map(str::to_owned) {
            Some(target) => {
                let message = self.people_message(ProfileAction::Set, &target, Value::Map(props));
                messages.profile_mutation(message);
            }
            None => {
                if let Some(record) = self.identities.pending_mut() {
                    record.buffer_set(props);
                }
                note_persist_failure(self.persist_identities(None));
            }
        }
    }

    fn people_increment(&mut self, amounts: Increments, messages: &dyn MessageSink) {
        match self.identities.people_identity().map(str::to_owned) {
            Some(target) => {
                let message =
                    self.people_message(ProfileAction::Increment, &target, Value::from(&amounts));
                messages.profile_mutation(message);
            }
            None => {
                if let Some(record) = self.identities.pending_mut() {
                    record.buffer_increment(amounts);
                }
                note_persist_failure(self.persist_identities(None));
            }
        }
    }

    fn people_delete(&mut self, messages: &dyn MessageSink) {
        // deleting an unidentified profile is a no-op, not an error
        let Some(target) = self.identities.people_identity().map(str::to_owned) else {
            return;
        };
        let message = self.people_message(ProfileAction::Delete, &target, Value::Null);
        messages.profile_mutation(message);
    }

    fn set_push_registration_id(&mut self, registration_id: String, messages: &dyn MessageSink) {
        let Some(target) = self.identities.people_identity().map(str::to_owned) else {
            return;
        };
        note_persist_failure(self.persistor.put(&self.token, persist::PUSH_ID, &registration_id));
        let mut devices = Properties::default();
        devices.insert(
            "devices".to_owned(),
            Value::Array(vec![Value::String(registration_id)]),
        );
        let message = self.people_message(ProfileAction::Union, &target, Value::Map(devices));
        messages.profile_mutation(message);
    }

    fn clear_push_registration_id(&mut self, messages: &dyn MessageSink) {
        note_persist_failure(self.persistor.remove(&self.token, persist::PUSH_ID));
        // routed through the regular set path, so it buffers while the
        // profile identity is still unset
        let mut devices = Properties::default();
        devices.insert("devices".to_owned(), Value::Array(Vec::new()));
        self.people_set(devices, messages);
    }

    fn push_registration_id(&mut self) -> Option<String> {
        match self.persistor.get(&self.token, persist::PUSH_ID) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "could not read push registration id");
                None
            }
        }
    }

    fn reset(&mut self) {
        note_persist_failure(self.persistor.wipe(&self.token));
        self.identities = IdentityKeeper::new();
        self.super_properties = SuperPropertyKeeper::new();
    }
}

// ------------- Tracker -------------
/// A token-scoped instrumentation instance.
///
/// Holds the identity slots, the super-property store and the pending
/// profile buffer for one project token, restores them from the persistence
/// layer on construction, and keeps the persisted copy in step with every
/// mutation. Outgoing records go to the [`MessageSink`] handed in at
/// construction; the tracker never waits on delivery.
///
/// All operations serialize on one internal lock, so a `Tracker` can be
/// shared freely across threads.
pub struct Tracker {
    token: String,
    core: Arc<Mutex<Core>>,
    messages: Arc<dyn MessageSink>,
}

impl Tracker {
    pub fn new(
        token: &str,
        config: &TrackerConfig,
        device: DeviceInfo,
        messages: Arc<dyn MessageSink>,
    ) -> Result<Tracker> {
        let persistor = Persistor::new(&config.persistence_mode())?;
        Tracker::with_persistor(token, config, device, messages, persistor)
    }

    /// Like [`Tracker::new`] with a caller-supplied persistor, so state
    /// staged ahead of construction (or carried over from an earlier
    /// instance of the same store) is rehydrated.
    pub fn with_persistor(
        token: &str,
        config: &TrackerConfig,
        device: DeviceInfo,
        messages: Arc<dyn MessageSink>,
        persistor: Persistor,
    ) -> Result<Tracker> {
        let (mut core, rehydrated_people) = Core::restore(
            token.to_owned(),
            config.library_tag.clone(),
            device,
            persistor,
        );
        // Rehydration with a profile identity counts as the one
        // identity-establishment transition; a non-empty buffer flushes here,
        // before any public call can run.
        if let Some(distinct_id) = rehydrated_people {
            core.identify_people(distinct_id, messages.as_ref());
        }
        Ok(Tracker {
            token: token.to_owned(),
            core: Arc::new(Mutex::new(core)),
            messages,
        })
    }

    fn core(&self) -> MutexGuard<'_, Core> {
        relock(&self.core)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Associates all future events with the given distinct id. Does not
    /// touch the profile identity; see [`People::identify`] for that.
    pub fn identify(&self, distinct_id: &str) {
        self.core().identify_events(distinct_id.to_owned());
    }

    /// Builds the merged record for one event and hands it to the sink,
    /// fire-and-forget. Colliding keys resolve as: reserved fields lose to
    /// super properties, super properties lose to per-call properties, and
    /// an established events identity always wins the `distinct_id` field.
    pub fn track(&self, event_name: &str, properties: Option<Properties>) {
        self.core().track(event_name, properties, self.messages.as_ref());
    }

    pub fn register_super_properties(&self, props: Properties) {
        let mut core = self.core();
        core.super_properties.register_all(props);
        note_persist_failure(core.persist_super_properties());
    }

    pub fn register_super_properties_once(&self, props: Properties) {
        let mut core = self.core();
        core.super_properties.register_all_once(props);
        note_persist_failure(core.persist_super_properties());
    }

    pub fn unregister_super_property(&self, key: &str) {
        let mut core = self.core();
        core.super_properties.unregister(key);
        note_persist_failure(core.persist_super_properties());
    }

    pub fn clear_super_properties(&self) {
        let mut core = self.core();
        core.super_properties.clear_all();
        note_persist_failure(core.persist_super_properties());
    }

    pub fn super_properties(&self) -> Properties {
        self.core().super_properties.snapshot()
    }

    pub fn events_identity(&self) -> Option<String> {
        self.core().identities.events_identity().map(str::to_owned)
    }

    pub fn people_identity(&self) -> Option<String> {
        self.core().identities.people_identity().map(str::to_owned)
    }

    /// The profile surface for this tracker.
    pub fn people(&self) -> People {
        People {
            core: Arc::clone(&self.core),
            messages: Arc::clone(&self.messages),
        }
    }

    /// Pokes both sink submit triggers, events first.
    pub fn flush(&self) {
        self.messages.submit_events();
        self.messages.submit_people();
    }

    /// Wipes the persisted namespace for this token and reinitializes the
    /// identity slots, super properties and pending buffer to their
    /// defaults. Records already handed to the sink are unaffected.
    pub fn reset(&self) {
        self.core().reset();
    }
}

// ------------- People -------------
/// Profile operations for one tracker. Obtained via [`Tracker::people`];
/// shares the tracker's exclusion scope and sink.
pub struct People {
    core: Arc<Mutex<Core>>,
    messages: Arc<dyn MessageSink>,
}

impl People {
    fn core(&self) -> MutexGuard<'_, Core> {
        relock(&self.core)
    }

    /// Associates profile mutations with the given distinct id. Moving the
    /// slot from unset to set replays any buffered mutations before this
    /// call returns.
    pub fn identify(&self, distinct_id: &str) {
        self.core().identify_people(distinct_id.to_owned(), self.messages.as_ref());
    }

    /// Assigns the given properties on the profile, or buffers them while no
    /// profile identity exists.
    pub fn set(&self, properties: Properties) {
        self.core().people_set(properties, self.messages.as_ref());
    }

    pub fn set_one(&self, key: &str, value: impl Into<Value>) {
        let mut properties = Properties::default();
        properties.insert(key.to_owned(), value.into());
        self.set(properties);
    }

    /// Adds each amount to the named profile property (from zero if absent),
    /// or accumulates into the buffer while no profile identity exists.
    /// Negative amounts decrement.
    pub fn increment(&self, amounts: Increments) {
        self.core().people_increment(amounts, self.messages.as_ref());
    }

    pub fn increment_one(&self, key: &str, amount: i64) {
        let mut amounts = Increments::default();
        amounts.insert(key.to_owned(), amount);
        self.increment(amounts);
    }

    /// Emits a delete mutation for the identified profile. A no-op while no
    /// profile identity exists.
    pub fn delete_user(&self) {
        self.core().people_delete(self.messages.as_ref());
    }

    /// Stores the push registration id and unions it into the profile's
    /// device list. A no-op while no profile identity exists.
    pub fn set_push_registration_id(&self, registration_id: &str) {
        self.core()
            .set_push_registration_id(registration_id.to_owned(), self.messages.as_ref());
    }

    /// Forgets the stored push registration id and empties the profile's
    /// device list.
    pub fn clear_push_registration_id(&self) {
        self.core().clear_push_registration_id(self.messages.as_ref());
    }

    pub fn push_registration_id(&self) -> Option<String> {
        self.core().push_registration_id()
    }
}

// ------------- Registry -------------
/// Explicit token-to-instance registry, constructed and owned by the host
/// application: created once at startup, dropped at shutdown. Instances for
/// distinct tokens are fully independent.
pub struct Registry {
    config: TrackerConfig,
    device: DeviceInfo,
    messages: Arc<dyn MessageSink>,
    instances: Mutex<HashMap<String, Arc<Tracker>, OtherHasher>>,
}

impl Registry {
    pub fn new(config: TrackerConfig, device: DeviceInfo, messages: Arc<dyn MessageSink>) -> Registry {
        Registry {
            config,
            device,
            messages,
            instances: Mutex::new(HashMap::default()),
        }
    }

    /// Returns the shared tracker for a token, creating it on first use.
    pub fn instance(&self, token: &str) -> Result<Arc<Tracker>> {
        let mut instances = relock(&self.instances);
        if let Some(tracker) = instances.get(token) {
            return Ok(Arc::clone(tracker));
        }
        let tracker = Arc::new(Tracker::new(
            token,
            &self.config,
            self.device.clone(),
            Arc::clone(&self.messages),
        )?);
        instances.insert(token.to_owned(), Arc::clone(&tracker));
        Ok(tracker)
    }

    /// Wipes the persisted namespace for a token; see [`Tracker::reset`].
    pub fn reset(&self, token: &str) -> Result<()> {
        self.instance(token)?.reset();
        Ok(())
    }
}
