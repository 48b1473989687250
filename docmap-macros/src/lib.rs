//! Procedural macros for the docmap project.
//!
//! `#[derive(Entity)]` implements `docmap::document::Entity` for a struct with named fields:
//!
//! - the collection name is the struct's name, or the value of `#[entity(collection = "...")]`,
//! - the key is the first field, in declaration order, whose tag contains `_id`. A field's tag is
//!   `#[entity(tag = "...")]` if present, else its `#[serde(rename = "...")]`, else its own name.
//!   Tags are comma separated lists (`_id,omitempty`). A struct without such a field gets
//!   `KeyState::Absent`. The key field must serialize as `_id`, either by its name or by
//!   `#[serde(rename = "_id")]`; anything else is a compile error.
//! - the key field's type must implement `docmap::document::KeyValue`: `Option<T>`, `Bson`,
//!   `ObjectId`, `String`, `bson::Uuid`, `uuid::Uuid` and the integer types up to 64 bits.

#[allow(unused_extern_crates)]
extern crate self as docmap_macros;

mod entity;
mod locator;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::expand(parse_macro_input!(input as DeriveInput))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
