#![allow(dead_code)]

use docmap::{bson::oid::ObjectId, prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
pub struct Test {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
}

impl Test {
    pub fn named(name: &str) -> Self {
        Self { id: None, name: name.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "profiles")]
pub struct Profile {
    #[entity(tag = "_id,omitempty")]
    #[serde(rename = "_id")]
    pub handle: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: i64,
    pub value: i64,
}

/// Has no key field at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
pub struct Note {
    pub text: String,
}
