//! Type-erased per-node annotation store.
//!
//! Annotations let analysis passes attach arbitrary values to nodes
//! without the node schema knowing about them: at most one value per Rust
//! type per node, keyed by `TypeId`. Values are reference-counted, so
//! cloning a node shares its annotations rather than deep-copying them.

use std::any::{Any, TypeId};
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Open map from annotation type to value.
///
/// Annotations never participate in structural equality and have no
/// ordering guarantees across types; each type is an independent slot.
#[derive(Clone, Default)]
pub struct Annotations {
    map: FxHashMap<TypeId, Rc<dyn Any>>,
}

impl Annotations {
    #[must_use]
    pub fn new() -> Self {
        Annotations {
            map: FxHashMap::default(),
        }
    }

    /// Attaches `value`, replacing any existing annotation of type `T`.
    pub fn set<T: 'static>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Rc::new(value));
    }

    /// The annotation of type `T`, or `None` if never set. Absence is
    /// never an error.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Whether an annotation of type `T` is attached.
    #[must_use]
    pub fn has<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Removes the annotation of type `T`. Returns whether one was
    /// attached.
    pub fn erase<T: 'static>(&mut self) -> bool {
        self.map.remove(&TypeId::of::<T>()).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Raw slot access for the serialization layer.
    pub(crate) fn get_raw(&self, type_id: TypeId) -> Option<&Rc<dyn Any>> {
        self.map.get(&type_id)
    }

    /// Raw slot insertion for the deserialization layer.
    pub(crate) fn insert_raw(&mut self, type_id: TypeId, value: Rc<dyn Any>) {
        self.map.insert(type_id, value);
    }
}

impl core::fmt::Debug for Annotations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Annotations({})", self.map.len())
    }
}
