//! Self-describing resource schema for the /taxes endpoints.
//!
//! The class enum is sourced dynamically from the stored tax classes, so
//! the descriptor always reflects what the validation layer accepts.

use serde_json::{json, Value};

use crate::modules::tax_rates::models::STANDARD_CLASS;

/// Valid public class values: "standard" plus every stored slug.
pub fn class_enum(class_slugs: &[String]) -> Vec<String> {
    let mut classes = Vec::with_capacity(class_slugs.len() + 1);
    classes.push(STANDARD_CLASS.to_string());
    classes.extend(class_slugs.iter().cloned());
    classes
}

/// JSON-Schema-like descriptor of the tax rate resource and the accepted
/// collection query parameters.
pub fn describe(class_slugs: &[String]) -> Value {
    let classes = class_enum(class_slugs);

    json!({
        "schema": {
            "title": "tax_rate",
            "type": "object",
            "properties": {
                "id": {
                    "description": "Unique identifier for the resource.",
                    "type": "integer",
                    "readonly": true,
                },
                "country": {
                    "description": "Country ISO 3166 code.",
                    "type": "string",
                },
                "state": {
                    "description": "State code.",
                    "type": "string",
                },
                "postcode": {
                    "description": "Postcode / ZIP.",
                    "type": "string",
                },
                "city": {
                    "description": "City name.",
                    "type": "string",
                },
                "rate": {
                    "description": "Tax rate.",
                    "type": "string",
                },
                "name": {
                    "description": "Tax rate name.",
                    "type": "string",
                },
                "priority": {
                    "description": "Tax priority.",
                    "type": "integer",
                    "default": 1,
                },
                "compound": {
                    "description": "Whether or not this is a compound rate.",
                    "type": "boolean",
                    "default": false,
                },
                "shipping": {
                    "description": "Whether or not this tax rate also gets applied to shipping.",
                    "type": "boolean",
                    "default": true,
                },
                "order": {
                    "description": "Indicates the order that will appear in queries.",
                    "type": "integer",
                },
                "class": {
                    "description": "Tax class.",
                    "type": "string",
                    "default": STANDARD_CLASS,
                    "enum": classes.clone(),
                },
            },
        },
        "collection_params": {
            "page": {
                "description": "Current page of the collection.",
                "type": "integer",
                "default": 1,
                "minimum": 1,
            },
            "per_page": {
                "description": "Maximum number of items to be returned in result set.",
                "type": "integer",
                "default": 10,
                "minimum": 1,
                "maximum": 100,
            },
            "offset": {
                "description": "Offset the result set by a specific number of items.",
                "type": "integer",
            },
            "order": {
                "description": "Order sort attribute ascending or descending.",
                "type": "string",
                "default": "asc",
                "enum": ["asc", "desc"],
            },
            "orderby": {
                "description": "Sort collection by object attribute.",
                "type": "string",
                "default": "order",
                "enum": ["id", "order"],
            },
            "class": {
                "description": "Filter by tax class.",
                "type": "string",
                "enum": classes,
            },
            "code": {
                "description": "Search by similar tax code.",
                "type": "string",
            },
            "include": {
                "description": "Limit result set to items with the specified rate IDs, comma separated.",
                "type": "string",
                "default": "",
            },
        },
    })
}
