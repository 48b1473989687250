//! Tag-based field lookup over serialized documents.
//!
//! A tag is a comma separated list, e.g. `_id,omitempty`. A field matches a tag value when the
//! value is one of the list's entries. Lookups scan fields in declaration order and stop at the
//! first match; finding nothing is not an error.

use bson::{Bson, Document};

/// Returns `true` if the comma separated `tag` contains `value` as one of its entries.
pub fn tag_contains(tag: &str, value: &str) -> bool {
    tag.split(',').any(|entry| entry == value)
}

/// Returns the first field of `document` whose key, read as a tag, contains `tag_value`.
pub fn find_field_by_tag<'a>(document: &'a Document, tag_value: &str) -> Option<(&'a str, &'a Bson)> {
    document
        .iter()
        .find(|(key, _)| tag_contains(key, tag_value))
        .map(|(key, value)| (key.as_str(), value))
}
