//! Result assembly: the flat parsed namespace back into per-schema records.
//!
//! After matching, every destination key holds exactly one coerced value.
//! [`assemble`](crate::ArgParser) splits that flat set into one
//! [`ParsedRecord`] per registered schema, in registration order; keys
//! registered directly on the parser (outside any schema) form a trailing
//! auxiliary [`Namespace`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::value::ArgValue;

/// An ordered mapping from destination key to coerced value.
///
/// # Examples
///
/// ```
/// use record_args_core::{ArgValue, Namespace};
///
/// let mut ns = Namespace::default();
/// ns.insert("epochs", ArgValue::Int(5));
/// assert_eq!(ns.get_int("epochs"), Some(5));
/// assert_eq!(ns.get_str("epochs"), None);
/// assert_eq!(ns.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace {
    values: BTreeMap<String, ArgValue>,
}

impl Namespace {
    /// Inserts a value, overwriting any earlier value for the key.
    pub fn insert(&mut self, key: &str, value: ArgValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Looks up a value by destination key.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    /// Looks up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ArgValue::as_str)
    }

    /// Looks up an integer value.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ArgValue::as_i64)
    }

    /// Looks up a float value (integers widen).
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ArgValue::as_f64)
    }

    /// Looks up a boolean value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ArgValue::as_bool)
    }

    /// Looks up a list value.
    pub fn get_list(&self, key: &str) -> Option<&[ArgValue]> {
        self.get(key).and_then(ArgValue::as_list)
    }

    /// True when the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no keys are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over (key, value) pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One assembled record: the values of a single schema's fields.
///
/// # Examples
///
/// ```
/// use record_args_core::{ArgParser, DeclaredType, FieldSpec, RecordSchema};
///
/// let schema = RecordSchema::new("train")
///     .with_field(FieldSpec::new("epochs", DeclaredType::Int));
/// let parser = ArgParser::new(vec![schema]).unwrap();
/// let out = parser.parse(&["--epochs".into(), "5".into()]).unwrap();
///
/// let train = &out.records[0];
/// assert_eq!(train.name, "train");
/// assert_eq!(train.get_int("epochs"), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRecord {
    /// The record schema's name.
    pub name: String,
    /// Field values keyed by destination.
    pub values: Namespace,
}

impl ParsedRecord {
    /// Looks up a value by field name.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    /// Looks up a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get_str(key)
    }

    /// Looks up an integer field.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get_int(key)
    }

    /// Looks up a float field (integers widen).
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.values.get_float(key)
    }

    /// Looks up a boolean field.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get_bool(key)
    }

    /// Looks up a list field.
    pub fn get_list(&self, key: &str) -> Option<&[ArgValue]> {
        self.values.get_list(key)
    }
}

/// Membership of one record schema: its name and destination keys, in
/// declaration order.
#[derive(Debug, Clone)]
pub(crate) struct RecordMembership {
    pub(crate) name: String,
    pub(crate) dests: Vec<String>,
}

/// Splits the flat namespace into per-schema records plus the auxiliary
/// namespace of parser-level extras.
///
/// Records come out in registration order; every key claimed by a schema
/// is removed from the pool, and whatever remains (extras registered
/// directly on the parser) forms the trailing namespace.
pub(crate) fn assemble(
    memberships: &[RecordMembership],
    mut pool: HashMap<String, ArgValue>,
) -> (Vec<ParsedRecord>, Namespace) {
    let mut records = Vec::with_capacity(memberships.len());
    for membership in memberships {
        let mut values = Namespace::default();
        for dest in &membership.dests {
            if let Some(value) = pool.remove(dest) {
                values.insert(dest, value);
            }
        }
        records.push(ParsedRecord {
            name: membership.name.clone(),
            values,
        });
    }

    let mut extras = Namespace::default();
    for (key, value) in pool {
        extras.insert(&key, value);
    }

    (records, extras)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_splits_by_membership_in_order() {
        let memberships = vec![
            RecordMembership {
                name: "train".to_string(),
                dests: vec!["epochs".to_string(), "lr".to_string()],
            },
            RecordMembership {
                name: "logging".to_string(),
                dests: vec!["log_dir".to_string()],
            },
        ];

        let mut pool = HashMap::new();
        pool.insert("epochs".to_string(), ArgValue::Int(5));
        pool.insert("lr".to_string(), ArgValue::Float(0.1));
        pool.insert("log_dir".to_string(), ArgValue::Str("./logs".into()));
        pool.insert("extra".to_string(), ArgValue::Bool(true));

        let (records, extras) = assemble(&memberships, pool);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "train");
        assert_eq!(records[0].get_int("epochs"), Some(5));
        assert_eq!(records[1].get_str("log_dir"), Some("./logs"));
        assert_eq!(extras.get_bool("extra"), Some(true));
        assert_eq!(extras.len(), 1);
    }

    #[test]
    fn test_record_serializes_to_json() {
        let mut values = Namespace::default();
        values.insert("epochs", ArgValue::Int(5));
        values.insert("flag", ArgValue::Bool(false));
        let record = ParsedRecord {
            name: "train".to_string(),
            values,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["values"]["epochs"], 5);
        assert_eq!(json["values"]["flag"], false);
    }
}
