//! # Null Augmentation
//!
//! Most period values in a payload are optional: an unmentioned benefit is
//! written as `null` rather than omitted. Engine schemas type those values
//! strictly, so before compilation every schema reached through
//! `additionalProperties` is widened to also accept `null`.
//!
//! Widening rules for a node reached through `additionalProperties`:
//!
//! - `"type": [..]` gains `"null"` if absent;
//! - `"type": "number"` becomes `["number", "null"]`;
//! - any other `type` is left alone.
//!
//! Traversal descends into `additionalProperties` (widened), `properties`
//! and `items` (not widened), and `anyOf`/`allOf`/`oneOf` (inheriting the
//! parent's state). `$ref` targets are not followed; each component schema
//! is augmented on its own.

use serde_json::{json, Value};

const COMBINATORS: [&str; 3] = ["anyOf", "allOf", "oneOf"];

/// Widen every `additionalProperties` schema under `schema` to accept null.
pub fn allow_null_in_additional_properties(schema: &mut Value) {
    augment(schema, false);
}

fn augment(node: &mut Value, inside_additional: bool) {
    let Value::Object(map) = node else {
        return;
    };

    if inside_additional {
        if let Some(ty) = map.get_mut("type") {
            ensure_null_type(ty);
        }
    }

    if let Some(additional) = map.get_mut("additionalProperties") {
        augment(additional, true);
    }
    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        for child in properties.values_mut() {
            augment(child, false);
        }
    }
    if let Some(items) = map.get_mut("items") {
        augment(items, false);
    }
    for keyword in COMBINATORS {
        if let Some(Value::Array(children)) = map.get_mut(keyword) {
            for child in children {
                augment(child, inside_additional);
            }
        }
    }
}

fn ensure_null_type(ty: &mut Value) {
    if ty.as_str() == Some("number") {
        *ty = json!(["number", "null"]);
    } else if let Value::Array(types) = ty {
        if !types.iter().any(|t| t.as_str() == Some("null")) {
            types.push(Value::from("null"));
        }
    }
}
