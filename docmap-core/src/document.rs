//! Core traits and types for entity representation and serialization.
//!
//! An [`Entity`] is any serde record stored as one document. Entities tell the mapper which
//! collection they default to and what their primary key currently holds, as a [`KeyState`].
//! Both are normally generated with `#[derive(Entity)]`.

use bson::{
    Bson, Document, Uuid, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{DocumentMapperError, DocumentMapperResult},
    resolver::default_collection_name,
};

/// Name of the document field holding the primary key.
pub const KEY_FIELD: &str = "_id";

/// Core trait that all entities mapped by the document mapper must implement.
///
/// # Deriving
///
/// `#[derive(Entity)]` resolves the collection name from the type name at compile time and locates
/// the key field by its serialization tag:
///
/// ```ignore
/// use docmap::prelude::*;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Entity)]
/// pub struct Test {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     pub name: String,
/// }
///
/// assert_eq!(Test::collection_name(), "Test");
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Returns the name of the collection this entity is stored in unless a caller names one.
    ///
    /// Defaults to the simple name of the type.
    fn collection_name() -> &'static str {
        default_collection_name::<Self>()
    }

    /// Returns the current state of this entity's primary key.
    fn key(&self) -> KeyState;
}

/// The state of an entity's primary key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyState {
    /// The entity type has no key field.
    Absent,
    /// The key field exists but holds no key yet.
    Unset,
    /// The key field holds a usable key.
    Set(Bson),
}

impl KeyState {
    /// Classifies a raw BSON key value.
    ///
    /// Null, undefined, empty strings and the all-zero object id are unset. Every other value,
    /// numeric zero included, is a usable key.
    pub fn from_bson(value: Bson) -> Self {
        match value {
            Bson::Null | Bson::Undefined => KeyState::Unset,
            Bson::String(s) if s.is_empty() => KeyState::Unset,
            Bson::ObjectId(oid) if oid.bytes() == [0u8; 12] => KeyState::Unset,
            value => KeyState::Set(value),
        }
    }

    /// Returns the key value if it is set.
    pub fn value(&self) -> Option<&Bson> {
        match self {
            KeyState::Set(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, KeyState::Set(_))
    }
}

/// Conversion from a key field's type into a [`KeyState`].
///
/// Implemented for `Option<T>` of any key type, `Bson`, `ObjectId`, `String`, `str`, `bson::Uuid`,
/// `uuid::Uuid` and the integer types up to 64 bits. The derive macro calls this on the located key
/// field.
pub trait KeyValue {
    fn key_state(&self) -> KeyState;
}

impl<T: KeyValue> KeyValue for Option<T> {
    fn key_state(&self) -> KeyState {
        match self {
            Some(value) => value.key_state(),
            None => KeyState::Unset,
        }
    }
}

impl<T: KeyValue + ?Sized> KeyValue for &T {
    fn key_state(&self) -> KeyState {
        (**self).key_state()
    }
}

impl KeyValue for Bson {
    fn key_state(&self) -> KeyState {
        KeyState::from_bson(self.clone())
    }
}

impl KeyValue for ObjectId {
    fn key_state(&self) -> KeyState {
        KeyState::from_bson(Bson::ObjectId(*self))
    }
}

impl KeyValue for String {
    fn key_state(&self) -> KeyState {
        self.as_str().key_state()
    }
}

impl KeyValue for str {
    fn key_state(&self) -> KeyState {
        KeyState::from_bson(Bson::String(self.to_string()))
    }
}

impl KeyValue for Uuid {
    fn key_state(&self) -> KeyState {
        KeyState::Set(Bson::from(*self))
    }
}

impl KeyValue for uuid::Uuid {
    fn key_state(&self) -> KeyState {
        Uuid::from_bytes(*self.as_bytes()).key_state()
    }
}

macro_rules! impl_key_value {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(
            impl KeyValue for $source {
                fn key_state(&self) -> KeyState {
                    KeyState::Set(Bson::$variant(<$target>::from(*self)))
                }
            }
        )+
    };
}

// Same widths the serializer picks for these types
impl_key_value!(Int32(i32): i8, i16, i32, u8, u16);
impl_key_value!(Int64(i64): i64, u32);

impl KeyValue for u64 {
    fn key_state(&self) -> KeyState {
        match i64::try_from(*self) {
            Ok(value) => KeyState::Set(Bson::Int64(value)),
            // Not storable; serializing the entity fails with the same value
            Err(_) => KeyState::Set(Bson::String(self.to_string())),
        }
    }
}

/// Extension trait providing BSON conversion for entities.
///
/// Automatically implemented for all types that implement [`Entity`].
pub trait EntityExt: Entity {
    /// Converts this entity to a BSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::InvalidArgument`] if the entity does not serialize to a
    /// document (for example a newtype around a scalar), or a serialization error.
    fn to_document(&self) -> DocumentMapperResult<Document>;

    /// Creates an entity from a BSON document.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the document does not match the entity's shape.
    fn from_document(document: Document) -> DocumentMapperResult<Self>;
}

impl<E: Entity> EntityExt for E {
    fn to_document(&self) -> DocumentMapperResult<Document> {
        match serialize_to_bson(self)? {
            Bson::Document(document) => Ok(document),
            other => Err(DocumentMapperError::InvalidArgument(format!(
                "entity {} must serialize to a document, got {:?}",
                default_collection_name::<E>(),
                other.element_type(),
            ))),
        }
    }

    fn from_document(document: Document) -> DocumentMapperResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(document))?)
    }
}
