// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;

use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Key holding the measured size points.
pub const DATA_SIZES: &str = "dataSizes";

/// Key distribution a benchmark run was generated with.
#[derive(Clone, Copy, Debug, EnumIter, EnumString, Eq, IntoStaticStr, PartialEq, Hash)]
pub enum Group {
    #[strum(serialize = "sparse")]
    Sparse,
    #[strum(serialize = "dense")]
    Dense,
    #[strum(serialize = "sequential")]
    Sequential,
}

/// Structure under test.
#[derive(Clone, Copy, Debug, EnumIter, EnumString, Eq, IntoStaticStr, PartialEq, Hash)]
pub enum Kind {
    #[strum(serialize = "ART")]
    Art,
    #[strum(serialize = "AA")]
    Aa,
}

pub const GROUPS: usize = 3;
pub const KINDS: usize = 2;

impl Group {
    pub fn name(&self) -> &'static str {
        (*self).into()
    }
}

impl Kind {
    pub fn name(&self) -> &'static str {
        (*self).into()
    }
}

/// A parsed benchmark result. Lookups are by key name so the order keys
/// appear in the input never matters.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, Error> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(Error::InvalidType {
                path: "$".to_owned(),
                expected: "object",
            }),
        }
    }

    pub fn data_sizes(&self) -> Result<Vec<f64>, Error> {
        let sizes = self.sequence(DATA_SIZES)?;
        sizes
            .iter()
            .enumerate()
            .map(|(i, v)| number(v, || format!("{}[{}]", DATA_SIZES, i)))
            .collect()
    }

    /// Number of size points without converting them.
    pub fn size_points(&self) -> Result<usize, Error> {
        Ok(self.sequence(DATA_SIZES)?.len())
    }

    /// The value measured for `kind` under `group` at size point `index`.
    pub fn measurement(&self, group: Group, kind: Kind, index: usize) -> Result<f64, Error> {
        let group_name = group.name();
        let kind_name = kind.name();

        let table = match self.lookup(group_name)? {
            Value::Object(table) => table,
            _ => {
                return Err(Error::InvalidType {
                    path: group_name.to_owned(),
                    expected: "object",
                })
            }
        };

        let path = || format!("{}.{}", group_name, kind_name);

        let values = match table.get(kind_name) {
            Some(Value::Array(values)) => values,
            Some(_) => {
                return Err(Error::InvalidType {
                    path: path(),
                    expected: "array",
                })
            }
            None => return Err(Error::MissingKey(path())),
        };

        let value = values.get(index).ok_or_else(|| Error::OutOfRange {
            path: path(),
            index,
            len: values.len(),
        })?;

        number(value, || format!("{}[{}]", path(), index))
    }

    /// Keys that play no part in reshaping: unknown top level keys and
    /// unknown structure names inside a known group.
    pub fn unrecognized(&self) -> Vec<String> {
        let mut keys = Vec::new();

        for (key, value) in &self.root {
            if key == DATA_SIZES {
                continue;
            }
            if key.parse::<Group>().is_err() {
                keys.push(key.clone());
                continue;
            }
            if let Value::Object(table) = value {
                for kind in table.keys() {
                    if kind.parse::<Kind>().is_err() {
                        keys.push(format!("{}.{}", key, kind));
                    }
                }
            }
        }

        keys
    }

    fn lookup(&self, key: &str) -> Result<&Value, Error> {
        self.root
            .get(key)
            .ok_or_else(|| Error::MissingKey(key.to_owned()))
    }

    fn sequence(&self, key: &str) -> Result<&Vec<Value>, Error> {
        match self.lookup(key)? {
            Value::Array(values) => Ok(values),
            _ => Err(Error::InvalidType {
                path: key.to_owned(),
                expected: "array",
            }),
        }
    }
}

fn number(value: &Value, path: impl FnOnce() -> String) -> Result<f64, Error> {
    value.as_f64().ok_or_else(|| Error::InvalidType {
        path: path(),
        expected: "number",
    })
}

/// Group names in bar order.
pub fn group_names() -> Vec<&'static str> {
    Group::iter().map(|g| g.name()).collect()
}

/// Structure names in series order.
pub fn kind_names() -> Vec<&'static str> {
    Kind::iter().map(|k| k.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"dataSizes":[1024,2048],"sparse":{"ART":[1,2],"AA":[3,4]},"dense":{"ART":[5,6],"AA":[7,8]},"sequential":{"ART":[9,10],"AA":[11,12]}}"#;

    #[test]
    fn fixed_orders() {
        assert_eq!(group_names(), vec!["sparse", "dense", "sequential"]);
        assert_eq!(kind_names(), vec!["ART", "AA"]);
        assert_eq!(group_names().len(), GROUPS);
        assert_eq!(kind_names().len(), KINDS);
    }

    #[test]
    fn parse_sizes() {
        let document = Document::parse(SAMPLE).unwrap();
        assert_eq!(document.data_sizes().unwrap(), vec![1024.0, 2048.0]);
        assert_eq!(document.size_points().unwrap(), 2);
    }

    #[test]
    fn lookup_measurement() {
        let document = Document::parse(SAMPLE).unwrap();
        assert_eq!(document.measurement(Group::Dense, Kind::Aa, 1).unwrap(), 8.0);
        assert_eq!(document.measurement(Group::Sequential, Kind::Art, 0).unwrap(), 9.0);
    }

    #[test]
    fn floats_are_accepted() {
        let document = Document::parse(
            r#"{"dataSizes":[1536.0],"sparse":{"ART":[0.25],"AA":[1]},"dense":{"ART":[1],"AA":[1]},"sequential":{"ART":[1],"AA":[1]}}"#,
        )
        .unwrap();
        assert_eq!(document.data_sizes().unwrap(), vec![1536.0]);
        assert_eq!(document.measurement(Group::Sparse, Kind::Art, 0).unwrap(), 0.25);
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(Document::parse("{\"dataSizes\":"), Err(Error::Parse(_))));
        assert!(matches!(Document::parse("not json"), Err(Error::Parse(_))));
    }

    #[test]
    fn root_must_be_object() {
        assert!(matches!(
            Document::parse("[1, 2, 3]"),
            Err(Error::InvalidType { expected: "object", .. })
        ));
    }

    #[test]
    fn missing_sizes() {
        let document = Document::parse(r#"{"sparse":{}}"#).unwrap();
        match document.data_sizes() {
            Err(Error::MissingKey(key)) => assert_eq!(key, "dataSizes"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_kind() {
        let document = Document::parse(r#"{"dataSizes":[1],"dense":{"ART":[1]}}"#).unwrap();
        match document.measurement(Group::Dense, Kind::Aa, 0) {
            Err(Error::MissingKey(key)) => assert_eq!(key, "dense.AA"),
            other => panic!("unexpected result: {:?}", other),
        }
        match document.measurement(Group::Sparse, Kind::Art, 0) {
            Err(Error::MissingKey(key)) => assert_eq!(key, "sparse"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn short_sequence() {
        let document = Document::parse(r#"{"dataSizes":[1,2],"dense":{"ART":[1]}}"#).unwrap();
        match document.measurement(Group::Dense, Kind::Art, 1) {
            Err(Error::OutOfRange { path, index, len }) => {
                assert_eq!(path, "dense.ART");
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn wrong_types() {
        let document =
            Document::parse(r#"{"dataSizes":7,"dense":[],"sparse":{"ART":{}},"sequential":{"AA":["x"]}}"#)
                .unwrap();
        assert!(matches!(
            document.data_sizes(),
            Err(Error::InvalidType { expected: "array", .. })
        ));
        assert!(matches!(
            document.measurement(Group::Dense, Kind::Art, 0),
            Err(Error::InvalidType { expected: "object", .. })
        ));
        assert!(matches!(
            document.measurement(Group::Sparse, Kind::Art, 0),
            Err(Error::InvalidType { expected: "array", .. })
        ));
        assert!(matches!(
            document.measurement(Group::Sequential, Kind::Aa, 0),
            Err(Error::InvalidType { expected: "number", .. })
        ));
    }

    #[test]
    fn unrecognized_keys() {
        let document = Document::parse(
            r#"{"dataSizes":[],"random":{},"sparse":{"ART":[],"BTree":[]},"dense":{"AA":[]}}"#,
        )
        .unwrap();
        let mut keys = document.unrecognized();
        keys.sort();
        assert_eq!(keys, vec!["random".to_owned(), "sparse.BTree".to_owned()]);
        assert!(Document::parse(SAMPLE).unwrap().unrecognized().is_empty());
    }
}
