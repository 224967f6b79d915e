//! JSON helpers shared by every model.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Removes every key whose value is `null`.
///
/// `false`, `0`, empty strings and empty lists are values, not absences, and
/// are kept.
pub fn strip_absent(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().filter(|(_, value)| !value.is_null()).collect()
}

/// Either a raw JSON object straight from a response or an already built
/// entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<T> {
    Raw(Value),
    Decoded(T),
}

impl<T> From<Value> for Item<T> {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

/// Turns a list of mixed items into a list of entities, decoding the raw ones
/// with `from_json`.
pub fn coerce_list<T, F>(items: impl IntoIterator<Item = Item<T>>, from_json: F) -> Result<Vec<T>>
where
    F: Fn(Value) -> Result<T>,
{
    items
        .into_iter()
        .map(|item| match item {
            Item::Raw(value) => from_json(value),
            Item::Decoded(entity) => Ok(entity),
        })
        .collect()
}

/// Decodes a JSON value, reporting the path of the offending key on failure.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| Error::Decode {
        path: e.path().to_string(),
        message: e.into_inner().to_string(),
    })
}

/// Same as [`decode`] but straight from response bytes.
pub fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);

    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| Error::Decode {
        path: e.path().to_string(),
        message: e.into_inner().to_string(),
    })
}

/// The marshalling contract of every entity.
///
/// Optional fields are declared with `skip_serializing_if`, and `to_json`
/// additionally runs [`strip_absent`] so that no `null` ever reaches the wire.
pub trait JsonModel: Serialize + DeserializeOwned {
    fn from_json(value: Value) -> Result<Self> {
        decode(value)
    }

    fn to_json(&self) -> Result<Map<String, Value>> {
        object(self)
    }
}

/// Serializes `value` into a JSON object with absent keys stripped.
pub(crate) fn object<T: Serialize + ?Sized>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(strip_absent(map)),
        Ok(other) => Err(Error::Decode {
            path: ".".to_owned(),
            message: format!("expected an object, got {other}"),
        }),
        Err(e) => Err(Error::Decode {
            path: ".".to_owned(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn strip_absent_keeps_falsy_values() {
        let map = as_map(json!({
            "a": null,
            "b": false,
            "c": 0,
            "d": [],
            "e": "",
            "f": { "inner": null },
        }));

        let stripped = strip_absent(map);

        assert!(!stripped.contains_key("a"));
        assert_eq!(Some(&json!(false)), stripped.get("b"));
        assert_eq!(Some(&json!(0)), stripped.get("c"));
        assert_eq!(Some(&json!([])), stripped.get("d"));
        assert_eq!(Some(&json!("")), stripped.get("e"));
        assert_eq!(Some(&json!({ "inner": null })), stripped.get("f"));
    }

    #[test]
    fn strip_absent_is_idempotent() {
        let samples = [
            json!({}),
            json!({ "a": null }),
            json!({ "a": 1, "b": null, "c": [null], "d": "x" }),
            json!({ "nested": { "x": null }, "flag": true, "n": null }),
        ];

        for sample in samples {
            let once = strip_absent(as_map(sample));
            let twice = strip_absent(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Pair {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<u32>,
    }

    impl JsonModel for Pair {}

    #[test]
    fn coerce_mixed_items() {
        let items = vec![
            Item::Raw(json!({ "key": "a", "value": 1 })),
            Item::Decoded(Pair {
                key: "b".to_owned(),
                value: None,
            }),
        ];

        let pairs = coerce_list(items, Pair::from_json).unwrap();

        assert_eq!(
            vec![
                Pair {
                    key: "a".to_owned(),
                    value: Some(1)
                },
                Pair {
                    key: "b".to_owned(),
                    value: None
                },
            ],
            pairs
        );
    }

    #[test]
    fn coerce_reports_bad_raw_item() {
        let items: Vec<Item<Pair>> = vec![Item::Raw(json!({ "value": 1 }))];
        assert!(matches!(
            coerce_list(items, Pair::from_json),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn decode_names_the_path() {
        let err = decode::<Vec<Pair>>(json!([{ "key": "a" }, { "key": 3 }])).unwrap_err();
        match err {
            Error::Decode { path, .. } => assert_eq!("[1].key", path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn to_json_omits_absent_fields() {
        let pair = Pair {
            key: "a".to_owned(),
            value: None,
        };
        let map = pair.to_json().unwrap();
        assert_eq!(1, map.len());
        assert_eq!(pair, Pair::from_json(Value::Object(map)).unwrap());
    }
}
