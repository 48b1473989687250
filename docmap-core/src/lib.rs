//! A thin generic CRUD layer that maps Rust records to document database collections and back.
//!
//! This crate is the core of the docmap project and provides:
//!
//! - **Entity traits** ([`document`]) - The [`Entity`](document::Entity) contract and key states
//! - **Type resolution** ([`resolver`]) - Default collection names from entity types
//! - **Field lookup** ([`locator`]) - Tag-based location of the key field in documents
//! - **Store backend abstraction** ([`backend`]) - The driver primitives the mapper is built on
//! - **Connection management** ([`connection`]) - One backend plus a cache of collection handles
//! - **Mapper** ([`mapper`]) - Insert, find, exists, save, delete and find-all for any entity
//! - **Typed collections** ([`collection`]) - A mapper bound to one entity type and collection
//! - **Configuration** ([`config`]) - Host, port and database of the store
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use docmap::prelude::*;
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Entity)]
//! pub struct Test {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     pub id: Option<ObjectId>,
//!     pub name: String,
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmap_core;

pub mod backend;
pub mod collection;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod locator;
pub mod mapper;
pub mod resolver;
