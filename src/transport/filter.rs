use std::collections::BTreeMap;

use serde_json::Value;

/// A field filter value; several values mean "any of"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

/// Record selector sent with update/remove/read.
///
/// Serialized as `key=value` pairs joined by `&`; list values are
/// comma-joined. Field keys are emitted in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Raw(String),
    Fields(BTreeMap<String, FilterValue>),
}

impl Filter {
    pub fn raw(query: impl Into<String>) -> Self {
        Filter::Raw(query.into())
    }

    /// Single `key=value` filter
    pub fn by(key: impl Into<String>, value: impl ToString) -> Self {
        Filter::Fields(BTreeMap::new()).and(key, value)
    }

    /// `key=v1,v2,...` filter
    pub fn any_of<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        let mut fields = BTreeMap::new();
        fields.insert(key.into(), FilterValue::Many(values));
        Filter::Fields(fields)
    }

    /// Add another field constraint. A raw filter gets the pair appended.
    pub fn and(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            Filter::Fields(mut fields) => {
                fields.insert(key.into(), FilterValue::One(value.to_string()));
                Filter::Fields(fields)
            }
            Filter::Raw(query) => {
                let pair = format!("{}={}", key.into(), value.to_string());
                if query.is_empty() {
                    Filter::Raw(pair)
                } else {
                    Filter::Raw(format!("{}&{}", query, pair))
                }
            }
        }
    }

    pub fn to_query(&self) -> String {
        match self {
            Filter::Raw(query) => query.clone(),
            Filter::Fields(fields) => fields
                .iter()
                .map(|(key, value)| match value {
                    FilterValue::One(v) => format!("{}={}", key, v),
                    FilterValue::Many(vs) => format!("{}={}", key, vs.join(",")),
                })
                .collect::<Vec<_>>()
                .join("&"),
        }
    }

    /// The constraints as `(key, accepted values)`. Field values are taken
    /// as given; only a raw query is split on `&`, `=` and `,`.
    pub fn constraints(&self) -> Vec<(String, Vec<String>)> {
        match self {
            Filter::Fields(fields) => fields
                .iter()
                .map(|(key, value)| {
                    let accepted = match value {
                        FilterValue::One(v) => vec![v.clone()],
                        FilterValue::Many(vs) => vs.clone(),
                    };
                    (key.clone(), accepted)
                })
                .collect(),
            Filter::Raw(query) => query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((key, values)) => (
                        key.to_string(),
                        values.split(',').map(str::to_string).collect(),
                    ),
                    None => (pair.to_string(), vec![String::new()]),
                })
                .collect(),
        }
    }

    /// Whether a JSON record satisfies every constraint
    pub fn matches(&self, record: &Value) -> bool {
        self.constraints().iter().all(|(key, accepted)| {
            let actual = match record.get(key) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => return false,
                Some(other) => other.to_string(),
            };
            accepted.iter().any(|v| *v == actual)
        })
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}
