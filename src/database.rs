use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

// our own stuff that we need
use crate::channel::Channel;
use crate::codec::{self, Shape};
use crate::error::{CycError, Result};
use crate::frame::{Frame, FrameKeeper};
use crate::ident::{self, AsFrameId, FrameId};
use crate::invoke::{Call, Invoker};
use crate::value::Value;
use crate::wire::WireValue;

/// The classes fetched, with all their instances, by `get_major_classes`.
pub const MAJOR_CLASSES: [&str; 5] = ["Reactions", "Pathways", "Genes", "Compounds", "Proteins"];

// ------------- Shared -------------
/// What frames reach back to: the organism, the invoker and the identity map.
pub(crate) struct Shared {
    org_id: String,
    invoker: Invoker,
    keeper: Mutex<FrameKeeper>,
}

impl Shared {
    pub(crate) fn invoker(&self) -> &Invoker {
        &self.invoker
    }
    fn keeper(&self) -> Result<MutexGuard<'_, FrameKeeper>> {
        self.keeper.lock().map_err(|e| CycError::Lock(e.to_string()))
    }
    pub(crate) fn keep_frame(self: &Arc<Self>, id: FrameId, class: bool) -> Result<Arc<Frame>> {
        let frame = Frame::new(id.clone(), class, Arc::downgrade(self), self.org_id.clone());
        let (kept, previously_kept) = self.keeper()?.keep(frame);
        if previously_kept {
            kept.merge(&id, class)?;
        } else {
            debug!(frame = %kept.id(), class, "frame kept");
        }
        Ok(kept)
    }
}

// ------------- Database -------------
/// One selected organism: a scoped invoker plus the identity map of its frames.
///
/// Cloning is cheap and yields a handle to the same identity map.
#[derive(Clone)]
pub struct Database {
    shared: Arc<Shared>,
}

impl Database {
    /// Verifies the organism with the engine and opens a database on `channel`.
    pub fn open(org_id: &str, channel: impl Channel + 'static) -> Result<Self> {
        Self::select(org_id, &Invoker::new(channel))
    }

    pub(crate) fn select(org_id: &str, invoker: &Invoker) -> Result<Self> {
        let org_id = org_id.trim().to_uppercase();
        let known = invoker.call_unscoped(
            &Call::new("orgid-exist-p").arg(Value::symbol(org_id.as_str())),
            Shape::Boolean,
        )?;
        if !known.truthy() {
            return Err(CycError::UnknownOrganism(org_id));
        }
        info!(organism = %org_id, "organism selected");
        Ok(Self {
            shared: Arc::new(Shared {
                invoker: invoker.with_organism(&org_id),
                org_id,
                keeper: Mutex::new(FrameKeeper::new()),
            }),
        })
    }

    pub fn org_id(&self) -> &str {
        &self.shared.org_id
    }
    pub fn invoker(&self) -> &Invoker {
        &self.shared.invoker
    }
    pub fn frame_count(&self) -> Result<usize> {
        Ok(self.shared.keeper()?.len())
    }
    /// The frame already kept for `id`, if any. Never touches the network.
    pub fn cached(&self, id: impl AsFrameId) -> Result<Option<Arc<Frame>>> {
        Ok(self.shared.keeper()?.get(&id.frame_id()))
    }

    /// The one frame for `id`, created unloaded if it is not kept yet.
    /// Never touches the network.
    pub fn resolve(&self, id: impl AsFrameId) -> Result<Arc<Frame>> {
        self.shared.keep_frame(id.frame_id(), false)
    }
    pub fn resolve_class(&self, id: impl AsFrameId) -> Result<Arc<Frame>> {
        self.shared.keep_frame(id.frame_id(), true)
    }

    /// Looks a name up the way attribute access on a database does: a kept
    /// loaded frame first, then a class, then an instance. Classes come back
    /// with their instances listed, instances fully loaded.
    pub fn lookup(&self, name: &str) -> Result<Option<Arc<Frame>>> {
        if let Some(frame) = self.cached(name)? {
            if frame.data_loaded()? {
                return Ok(Some(frame));
            }
        }
        if let Some(class) = self.class(name)? {
            return Ok(Some(class));
        }
        self.frame(name)
    }

    /// A class frame by (approximate) name, asking the engine for the real one.
    pub fn class(&self, name: &str) -> Result<Option<Arc<Frame>>> {
        match self.is_a_class_name(name)? {
            Some(real) => Ok(Some(self.get_class_data(real, false)?)),
            None => Ok(None),
        }
    }

    /// An instance frame by (approximate) name, asking the engine for the
    /// real one and loading all its slots.
    pub fn frame(&self, name: &str) -> Result<Option<Arc<Frame>>> {
        let Some(real) = self.is_an_instance_name(name)? else {
            return Ok(None);
        };
        let frame = self.resolve(real)?;
        if !frame.data_loaded()? {
            frame.load_all()?;
        }
        Ok(Some(frame))
    }

    /// The real class name the engine maps `name` to, if it is a class.
    pub fn is_a_class_name(&self, name: &str) -> Result<Option<FrameId>> {
        let answer = self.invoke(
            &Call::new("class-name-p").arg(Value::symbol(ident::engine_name(name))),
            Shape::Boolean,
        )?;
        Ok(real_name(answer, name))
    }
    /// The real frame id the engine maps `name` to, if it is an instance.
    pub fn is_an_instance_name(&self, name: &str) -> Result<Option<FrameId>> {
        let answer = self.invoke(
            &Call::new("frameid-instance-p").arg(Value::symbol(ident::engine_name(name))),
            Shape::Boolean,
        )?;
        Ok(real_name(answer, name))
    }

    /// The class frame, loaded, with its instances listed. With
    /// `with_instances_data` every instance is loaded too, in one request.
    pub fn get_class_data(&self, class: impl AsFrameId, with_instances_data: bool) -> Result<Arc<Frame>> {
        let frame = self.resolve_class(class)?;
        frame.load_all()?;
        if with_instances_data {
            let ids: Vec<FrameId> = frame.instances()?.iter().map(|f| f.id().clone()).collect();
            self.get_frame_objects(ids)?;
        }
        Ok(frame)
    }

    /// Instance ids of a class; the class name is sent exactly as given.
    pub fn get_class_all_instances(&self, class: impl AsFrameId) -> Result<Vec<FrameId>> {
        let listed = self.invoke(&Call::new("gcai").arg(class.frame_id()), Shape::Sequence)?;
        Ok(listed.listed_frame_ids())
    }

    /// Fetches the major classes and every one of their instances.
    pub fn get_major_classes(&self) -> Result<Vec<Arc<Frame>>> {
        MAJOR_CLASSES
            .iter()
            .map(|class| self.get_class_data(FrameId::from_symbol(class), true))
            .collect()
    }

    /// Fetches all listed frames in one request, whether kept already or not,
    /// overwriting their cached slots with what the engine sends.
    pub fn get_frame_objects<I, F>(&self, ids: I) -> Result<Vec<Arc<Frame>>>
    where
        I: IntoIterator<Item = F>,
        F: AsFrameId,
    {
        let ids: Vec<Value> = ids.into_iter().map(|id| Value::from(id.frame_id())).collect();
        let wire = self
            .invoker()
            .request(&Call::new("get-frame-objects").arg(ids))?;
        let entries: Vec<(FrameId, &WireValue)> = match &wire {
            w if w.is_empty_token() => Vec::new(),
            WireValue::Object(entries) => entries
                .iter()
                .map(|(id, slots)| (FrameId::from_symbol(id), slots))
                .collect(),
            WireValue::List(items) => items
                .iter()
                .map(|item| match item {
                    WireValue::List(inner) => match inner.split_first() {
                        Some((WireValue::Symbol(id) | WireValue::String(id), [slots])) => {
                            Ok((FrameId::from_symbol(id), slots))
                        }
                        _ => Err(CycError::decode("frame entry is not an id followed by its slots")),
                    },
                    _ => Err(CycError::decode("frame entry is not a list")),
                })
                .collect::<Result<_>>()?,
            other => {
                return Err(CycError::decode(format!("not a set of frames: {:?}", other)));
            }
        };
        // decode everything before touching any frame
        let mut decoded = Vec::with_capacity(entries.len());
        for (id, slots) in entries {
            decoded.push((id, codec::decode_slots(slots)?));
        }
        let mut frames = Vec::with_capacity(decoded.len());
        for (id, slots) in decoded {
            let frame = self.resolve(id)?;
            frame.absorb(slots)?;
            frames.push(frame);
        }
        debug!(frames = frames.len(), "frames fetched");
        Ok(frames)
    }

    /// One slot value, straight from the engine. No frame is created or updated.
    pub fn get_slot_value(&self, frame: impl AsFrameId, slot: &str) -> Result<Value> {
        self.invoke(&slot_call("get-slot-value", &frame, slot), Shape::Scalar)
    }
    /// All values of a slot, straight from the engine. No frame is created or updated.
    pub fn get_slot_values(&self, frame: impl AsFrameId, slot: &str) -> Result<Value> {
        self.invoke(&slot_call("get-slot-values", &frame, slot), Shape::Sequence)
    }

    /// Writes one slot value in the engine. Cached frame slots are left as
    /// they are; [`Frame::refresh`] re-reads them.
    pub fn put_slot_value(&self, frame: impl AsFrameId, slot: &str, value: impl Into<Value>) -> Result<Value> {
        self.invoke(&slot_call("put-slot-value", &frame, slot).arg(value), Shape::Any)
    }
    /// Replaces all values of a slot in the engine. Cached frame slots are
    /// left as they are.
    pub fn put_slot_values(&self, frame: impl AsFrameId, slot: &str, values: impl Into<Value>) -> Result<Value> {
        let values = match values.into() {
            Value::Sequence(items) => Value::Sequence(items),
            single => Value::Sequence(vec![single]),
        };
        self.invoke(&slot_call("put-slot-values", &frame, slot).arg(values), Shape::Any)
    }

    /// Runs any call against this organism, decoding under `shape`.
    pub fn invoke(&self, call: &Call, shape: Shape) -> Result<Value> {
        self.invoker().call(call, shape)
    }

    /// Runs flux balance analysis on an input file readable by the engine.
    pub fn run_fba(&self, file: &str) -> Result<Value> {
        self.invoke(&Call::new("python-run-fba").arg(file), Shape::Any)
    }
}

impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        self.org_id() == other.org_id()
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let count = self.shared.keeper.lock().map(|k| k.len()).unwrap_or(0);
        write!(f, "<Database {}, currently has {} frames>", self.org_id(), count)
    }
}
impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Database").field("org_id", &self.org_id()).finish()
    }
}

fn slot_call(operation: &str, frame: &impl AsFrameId, slot: &str) -> Call {
    Call::new(operation)
        .arg(frame.frame_id())
        .arg(Value::symbol(ident::engine_name(slot)))
}

// The engine answers name checks with the real name, `t` or nothing.
fn real_name(answer: Value, asked: &str) -> Option<FrameId> {
    match answer {
        Value::Symbol(name) | Value::String(name) => Some(FrameId::from_symbol(&name)),
        Value::Sequence(items) => items.first().and_then(Value::as_frame_id),
        other if other.truthy() => Some(FrameId::new(asked)),
        _ => None,
    }
}
