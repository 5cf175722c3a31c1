use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

// used to pair accessor-safe slot names with their engine spelling
use bimap::BiMap;

// the identity map and slot tables are keyed by canonical strings
use core::hash::BuildHasherDefault;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use seahash::SeaHasher;

// used to print out readable forms of a frame
use std::fmt;

use tracing::debug;

// our own stuff that we need
use crate::codec::{self, Shape};
use crate::database::Shared;
use crate::error::{CycError, Result};
use crate::ident::{self, FrameId};
use crate::invoke::Call;
use crate::value::Value;

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

// ------------- Slots -------------
#[derive(Debug, Default)]
pub struct SlotTable {
    values: HashMap<String, Value, KeyHasher>,
    accessors: BiMap<String, String>, // accessor name <-> canonical slot name
}
impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.values.get(slot)
    }
    /// Stores a fetched value; returns true if the slot was already cached.
    pub fn fill(&mut self, slot: String, value: Value) -> bool {
        if let Some(accessor) = ident::to_accessor_name(&slot) {
            self.accessors.insert(accessor, slot.clone());
        }
        self.values.insert(slot, value).is_some()
    }
    /// Canonical slot name for an accessor name, preferring slots we have
    /// seen over the generic translation.
    pub fn resolve_accessor(&self, accessor: &str) -> String {
        match self.accessors.get_by_left(&accessor.to_lowercase()) {
            Some(slot) => slot.clone(),
            None => ident::slot_key(accessor),
        }
    }
    pub fn accessor_of(&self, slot: &str) -> Option<&String> {
        self.accessors.get_by_right(slot)
    }
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }
    pub fn accessor_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.accessors.left_values().cloned().collect();
        names.sort();
        names
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ------------- Frame -------------
#[derive(Debug, Default)]
struct FrameState {
    loaded: bool,
    slots: SlotTable,
    instances: Option<Vec<Arc<Frame>>>,
}

/// A lazily populated proxy for one engine object, instance or class.
///
/// Frames are only created by a [`Database`](crate::database::Database),
/// which keeps exactly one per canonical frame id. The canonical id never
/// changes. Until the first whole-frame fetch a frame may still learn the
/// engine's own spelling of its id and that it is a class; after that both
/// are fixed. The slot cache only grows, and is overwritten only by an
/// explicit whole-frame fetch.
pub struct Frame {
    id: FrameId,
    confirmed: OnceLock<FrameId>, // the engine's spelling, when it differs from the first one seen
    class: AtomicBool,
    org_id: String,
    owner: Weak<Shared>,
    state: RwLock<FrameState>,
}

impl Frame {
    pub(crate) fn new(id: FrameId, class: bool, owner: Weak<Shared>, org_id: String) -> Self {
        let state = FrameState {
            instances: if class { None } else { Some(Vec::new()) },
            ..FrameState::default()
        };
        Self {
            id,
            confirmed: OnceLock::new(),
            class: AtomicBool::new(class),
            org_id,
            owner,
            state: RwLock::new(state),
        }
    }
    pub fn id(&self) -> &FrameId {
        self.confirmed.get().unwrap_or(&self.id)
    }
    pub fn is_class(&self) -> bool {
        self.class.load(Ordering::Acquire)
    }
    pub fn org_id(&self) -> &str {
        &self.org_id
    }
    pub fn data_loaded(&self) -> Result<bool> {
        Ok(self.read()?.loaded)
    }

    /// Indexed slot lookup; accepts any spelling of the slot name.
    ///
    /// Served from the cache when the slot is cached or the whole frame has
    /// been loaded (a slot missing from a loaded frame is the absent-marker).
    /// Otherwise exactly one request fetches that slot alone.
    pub fn slot(&self, name: &str) -> Result<Value> {
        self.fetch(ident::slot_key(name))
    }

    /// Accessor-style slot lookup, e.g. `common_name`. Names without an
    /// accessor form (`N+1-NAME`) are only reachable through [`Frame::slot`].
    pub fn attr(&self, accessor: &str) -> Result<Value> {
        if !ident::is_accessor_name(accessor) {
            return Err(CycError::InvalidAccessor(accessor.to_owned()));
        }
        let slot = self.read()?.slots.resolve_accessor(accessor);
        self.fetch(slot)
    }

    fn fetch(&self, slot: String) -> Result<Value> {
        {
            let state = self.read()?;
            if let Some(value) = state.slots.get(&slot) {
                return Ok(value.clone());
            }
            if state.loaded {
                return Ok(Value::Null);
            }
        }
        let shared = self.owner()?;
        let call = Call::new("get-slot-values")
            .arg(self.id())
            .arg(Value::symbol(slot.as_str()));
        let value = shared.invoker().call(&call, Shape::Sequence)?;
        debug!(frame = %self.id(), slot = %slot, "slot cached");
        self.write()?.slots.fill(slot, value.clone());
        Ok(value)
    }

    /// Frames are read only. Slot values of the engine's object are changed
    /// through the database's `put_slot_value`/`put_slot_values`.
    pub fn assign(&self, slot: &str, _value: impl Into<Value>) -> Result<()> {
        Err(CycError::ReadOnly {
            frame: self.id().to_string(),
            slot: slot.to_owned(),
        })
    }

    /// Fetches the whole frame, merging every slot into the cache. For a
    /// class, also lists its instances, creating near-empty frames for them.
    pub fn load_all(&self) -> Result<()> {
        let shared = self.owner()?;
        let wire = shared
            .invoker()
            .request(&Call::new("get-frame-object").arg(self.id()))?;
        if wire.is_empty_token() {
            return Err(CycError::MissingFrame(format!("{} in organism {}", self.id(), self.org_id)));
        }
        self.absorb(codec::decode_slots(&wire)?)?;
        if self.is_class() {
            let listed = shared
                .invoker()
                .call(&Call::new("gcai").arg(self.id()), Shape::Sequence)?;
            let mut instances = Vec::new();
            for id in listed.listed_frame_ids() {
                instances.push(shared.keep_frame(id, false)?);
            }
            debug!(class = %self.id(), instances = instances.len(), "instances listed");
            self.write()?.instances = Some(instances);
        }
        Ok(())
    }

    /// Re-fetches the whole frame, overwriting cached slot values.
    pub fn refresh(&self) -> Result<()> {
        self.load_all()
    }

    pub(crate) fn ensure_loaded(&self) -> Result<()> {
        let pending = {
            let state = self.read()?;
            !state.loaded || state.instances.is_none()
        };
        if pending { self.load_all() } else { Ok(()) }
    }

    /// Folds what a later reference knows into the kept frame: a verbatim
    /// spelling replaces a reader-normalized one, and a class reference turns
    /// a not yet loaded frame into a class.
    pub(crate) fn merge(&self, id: &FrameId, class: bool) -> Result<()> {
        if id.is_verbatim() && !self.id().is_verbatim() && id.name() != self.id().name() {
            let _ = self.confirmed.set(id.clone());
        }
        if class && !self.is_class() {
            let mut state = self.write()?;
            if state.loaded {
                return Err(CycError::KindConflict(self.id().to_string()));
            }
            state.instances = None;
            self.class.store(true, Ordering::Release);
            debug!(frame = %self.id(), "frame is a class");
        }
        Ok(())
    }

    pub(crate) fn absorb(&self, slots: Vec<(String, Value)>) -> Result<()> {
        let mut state = self.write()?;
        for (slot, value) in slots {
            state.slots.fill(slot, value);
        }
        state.loaded = true;
        debug!(frame = %self.id(), slots = state.slots.len(), "frame loaded");
        Ok(())
    }

    pub fn instances(&self) -> Result<Vec<Arc<Frame>>> {
        if !self.is_class() {
            return Err(CycError::NotAClass(self.id().to_string()));
        }
        self.ensure_loaded()?;
        Ok(self.read()?.instances.clone().unwrap_or_default())
    }
    pub fn instance(&self, index: usize) -> Result<Option<Arc<Frame>>> {
        Ok(self.instances()?.get(index).cloned())
    }

    /// Explicitly turns the frame ids held in a slot into frames of the same
    /// database. Nothing is fetched for the referenced frames.
    pub fn references(&self, slot: &str) -> Result<Vec<Arc<Frame>>> {
        let value = self.slot(slot)?;
        let shared = self.owner()?;
        value
            .frame_ids()
            .into_iter()
            .map(|id| shared.keep_frame(id, false))
            .collect()
    }

    pub fn slot_names(&self) -> Result<Vec<String>> {
        Ok(self.read()?.slots.names())
    }
    pub fn accessor_names(&self) -> Result<Vec<String>> {
        Ok(self.read()?.slots.accessor_names())
    }
    pub fn accessor_of(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.read()?.slots.accessor_of(&ident::slot_key(slot)).cloned())
    }
    pub fn cached_slot_count(&self) -> Result<usize> {
        Ok(self.read()?.slots.len())
    }

    fn owner(&self) -> Result<Arc<Shared>> {
        self.owner
            .upgrade()
            .ok_or_else(|| CycError::Detached(self.id().to_string()))
    }
    fn read(&self) -> Result<RwLockReadGuard<'_, FrameState>> {
        self.state.read().map_err(|e| CycError::Lock(e.to_string()))
    }
    fn write(&self) -> Result<RwLockWriteGuard<'_, FrameState>> {
        self.state.write().map_err(|e| CycError::Lock(e.to_string()))
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.org_id == other.org_id && self.id() == other.id()
    }
}
impl PartialEq<str> for Frame {
    fn eq(&self, other: &str) -> bool {
        *self.id() == *other
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_class() {
            let count = self
                .state
                .read()
                .ok()
                .and_then(|s| s.instances.as_ref().map(Vec::len))
                .unwrap_or(0);
            write!(f, "<Frame class {} currently with {} instances ({})>", self.id(), count, self.org_id)
        } else {
            write!(f, "<Frame instance {} ({})>", self.id(), self.org_id)
        }
    }
}
impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", self.id())
            .field("class", &self.is_class())
            .field("org_id", &self.org_id)
            .finish()
    }
}

// ------------- FrameKeeper -------------
/// The identity map: one frame per canonical frame id.
#[derive(Debug, Default)]
pub struct FrameKeeper {
    kept: HashMap<String, Arc<Frame>, KeyHasher>,
}
impl FrameKeeper {
    pub fn new() -> Self {
        Self {
            kept: HashMap::default(),
        }
    }
    pub fn keep(&mut self, frame: Frame) -> (Arc<Frame>, bool) {
        match self.kept.entry(frame.id().key().to_owned()) {
            Entry::Occupied(e) => (Arc::clone(e.get()), true),
            Entry::Vacant(e) => (Arc::clone(e.insert(Arc::new(frame))), false),
        }
    }
    pub fn get(&self, id: &FrameId) -> Option<Arc<Frame>> {
        self.kept.get(id.key()).cloned()
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
    pub fn ids(&self) -> Vec<FrameId> {
        self.kept.values().map(|f| f.id().clone()).collect()
    }
}
