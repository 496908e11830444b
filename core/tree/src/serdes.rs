//! Annotation (de)serialization registry.
//!
//! Annotations are type-erased, so the serialization layer cannot know on
//! its own how to encode them. A [`SerdesRegistry`] maps an annotation
//! type to a short tag plus encode/decode behavior; the binary codec
//! consults it by type on the way out and by tag on the way back in, and
//! the dumpers use the optional display form for inline rendering.
//!
//! The registry is an explicit object threaded into every call that needs
//! it. Populate it once during startup, before any serialization that
//! depends on it; it is not internally synchronized.

use std::any::{Any, TypeId};
use std::fmt::Display;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::FormatError;

type EncodeFn = Box<dyn Fn(&dyn Any) -> Result<Vec<u8>, FormatError>>;
type DecodeFn = Box<dyn Fn(&[u8]) -> Result<Rc<dyn Any>, FormatError>>;
type DisplayFn = Box<dyn Fn(&dyn Any) -> Option<String>>;

pub(crate) struct SerdesEntry {
    pub(crate) type_id: TypeId,
    pub(crate) tag: String,
    pub(crate) encode: EncodeFn,
    pub(crate) decode: DecodeFn,
    pub(crate) display: Option<DisplayFn>,
}

/// Table of registered annotation kinds.
///
/// Registration is last-write-wins: registering a kind again replaces its
/// previous entry, and claims the tag even if another kind held it.
/// Entries keep registration order, which makes annotation output order
/// deterministic.
#[derive(Default)]
pub struct SerdesRegistry {
    entries: Vec<SerdesEntry>,
}

impl SerdesRegistry {
    #[must_use]
    pub fn new() -> Self {
        SerdesRegistry {
            entries: Vec::new(),
        }
    }

    /// Registers annotation type `T` under `tag`, deriving encode/decode
    /// from the type's serde representation and the inline display form
    /// from its `Display`.
    pub fn register<T>(&mut self, tag: &str)
    where
        T: Serialize + DeserializeOwned + Display + 'static,
    {
        self.insert(SerdesEntry {
            type_id: TypeId::of::<T>(),
            tag: tag.to_string(),
            encode: Box::new(|value| {
                let value = downcast::<T>(value)?;
                serde_json::to_vec(value).map_err(|error| FormatError::Annotation {
                    tag: std::any::type_name::<T>().to_string(),
                    reason: error.to_string(),
                })
            }),
            decode: Box::new(|bytes| {
                let value: T =
                    serde_json::from_slice(bytes).map_err(|error| FormatError::Annotation {
                        tag: std::any::type_name::<T>().to_string(),
                        reason: error.to_string(),
                    })?;
                Ok(Rc::new(value))
            }),
            display: Some(Box::new(|value| {
                value.downcast_ref::<T>().map(ToString::to_string)
            })),
        });
    }

    /// Registers annotation type `T` under `tag` with explicit encode and
    /// decode functions, for types without a serde representation. No
    /// display form is attached, so the annotation stays out of the text
    /// and JSON dumps.
    pub fn register_with<T, E, D>(&mut self, tag: &str, encode: E, decode: D)
    where
        T: 'static,
        E: Fn(&T) -> Result<Vec<u8>, FormatError> + 'static,
        D: Fn(&[u8]) -> Result<T, FormatError> + 'static,
    {
        self.insert(SerdesEntry {
            type_id: TypeId::of::<T>(),
            tag: tag.to_string(),
            encode: Box::new(move |value| encode(downcast::<T>(value)?)),
            decode: Box::new(move |bytes| Ok(Rc::new(decode(bytes)?) as Rc<dyn Any>)),
            display: None,
        });
    }

    /// Whether an annotation type is registered.
    #[must_use]
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.entry_for_type(TypeId::of::<T>()).is_some()
    }

    /// The tag an annotation type is registered under, if any.
    #[must_use]
    pub fn tag_of<T: 'static>(&self) -> Option<&str> {
        self.entry_for_type(TypeId::of::<T>())
            .map(|entry| entry.tag.as_str())
    }

    fn insert(&mut self, entry: SerdesEntry) {
        let stale = |existing: &SerdesEntry| {
            existing.type_id == entry.type_id || existing.tag == entry.tag
        };
        if self.entries.iter().any(|existing| stale(existing)) {
            debug!(tag = %entry.tag, "replacing existing annotation serdes registration");
            self.entries.retain(|existing| !stale(existing));
        } else {
            debug!(tag = %entry.tag, "registered annotation serdes");
        }
        self.entries.push(entry);
    }

    pub(crate) fn entry_for_type(&self, type_id: TypeId) -> Option<&SerdesEntry> {
        self.entries.iter().find(|entry| entry.type_id == type_id)
    }

    pub(crate) fn entry_for_tag(&self, tag: &str) -> Option<&SerdesEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &SerdesEntry> {
        self.entries.iter()
    }
}

fn downcast<T: 'static>(value: &dyn Any) -> Result<&T, FormatError> {
    value.downcast_ref::<T>().ok_or(FormatError::Annotation {
        tag: std::any::type_name::<T>().to_string(),
        reason: "annotation value has the wrong type".to_string(),
    })
}
