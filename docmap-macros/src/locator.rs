//! Compile-time lookup of fields by serialization tag.

use syn::{
    Expr, Field, FieldsNamed, LitStr, Token,
    meta::ParseNestedMeta,
    token::Paren,
};

/// Tag value marking the primary-key field.
pub(crate) const KEY_TAG: &str = "_id";

/// Returns `true` if the comma separated `tag` contains `value` as one of its entries.
pub(crate) fn tag_contains(tag: &str, value: &str) -> bool {
    tag.split(',').any(|entry| entry == value)
}

/// Returns the first field, in declaration order, whose tag contains `tag_value`.
pub(crate) fn find_field_by_tag<'a>(
    fields: &'a FieldsNamed,
    tag_value: &str,
) -> syn::Result<Option<&'a Field>> {
    for field in &fields.named {
        if tag_contains(&FieldTags::parse(field)?.tag(field), tag_value) {
            return Ok(Some(field));
        }
    }

    Ok(None)
}

/// Returns the key field. A field tagged `_id` must also serialize as `_id`.
pub(crate) fn find_key_field(fields: &FieldsNamed) -> syn::Result<Option<&Field>> {
    let Some(field) = find_field_by_tag(fields, KEY_TAG)? else {
        return Ok(None);
    };

    let serialized = FieldTags::parse(field)?.serialized_name(field);
    if serialized != KEY_TAG {
        return Err(syn::Error::new_spanned(
            field,
            format!(
                "key field serializes as `{serialized}`, add `#[serde(rename = \"{KEY_TAG}\")]`"
            ),
        ));
    }

    Ok(Some(field))
}

/// The naming attributes of one field.
#[derive(Default)]
struct FieldTags {
    entity_tag: Option<String>,
    serde_rename: Option<String>,
}

impl FieldTags {
    fn parse(field: &Field) -> syn::Result<Self> {
        let mut tags = Self::default();

        for attr in &field.attrs {
            if attr.path().is_ident("entity") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("tag") {
                        tags.entity_tag = Some(meta.value()?.parse::<LitStr>()?.value());
                        Ok(())
                    } else {
                        Err(meta.error("unsupported entity field attribute, expected `tag`"))
                    }
                })?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                        tags.serde_rename = Some(meta.value()?.parse::<LitStr>()?.value());
                        Ok(())
                    } else {
                        skip_meta(&meta)
                    }
                })?;
            }
        }

        Ok(tags)
    }

    /// `#[entity(tag = "...")]` wins over `#[serde(rename = "...")]`, which wins over the field name.
    fn tag(&self, field: &Field) -> String {
        self.entity_tag
            .clone()
            .unwrap_or_else(|| self.serialized_name(field))
    }

    fn serialized_name(&self, field: &Field) -> String {
        self.serde_rename.clone().unwrap_or_else(|| {
            field
                .ident
                .as_ref()
                .map(|ident| ident.to_string())
                .unwrap_or_default()
        })
    }
}

fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }

    Ok(())
}
