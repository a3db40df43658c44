use std::{collections::BTreeMap, fmt};

use indexmap::IndexMap;
use serde::{
    de::{DeserializeOwned, IgnoredAny, MapAccess, Visitor},
    Deserializer,
};
use serde_json::{Map, Value};

use crate::{error::ExtractError, query::Query};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// An error reported by the server in the `errors` list of a response.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        GraphqlError {
            message: message.into(),
            ..Default::default()
        }
    }
}

/// A GraphQL response document: the `data` map keyed by result name and the `errors` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphqlResponse {
    pub data: Option<Map<String, Value>>,
    pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlResponse {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn errors(&self) -> &[GraphqlError] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Fails if the response reports any error.
    ///
    /// A response may carry data alongside its errors. That partial data is never returned: any
    /// error fails the whole call.
    pub fn check(&self) -> Result<(), ExtractError> {
        let errors = self.errors();
        if errors.is_empty() {
            return Ok(());
        }

        tracing::debug!("GraphQL response with {} error(s)", errors.len());
        if self.data.as_ref().is_some_and(|data| !data.is_empty()) {
            tracing::warn!(
                "Discarding partial data of a GraphQL response with {} error(s)",
                errors.len()
            );
        }
        Err(ExtractError::Request(errors.to_vec()))
    }

    /// Converts the result of `query`, found under its alias or its name.
    pub fn extract<T: DeserializeOwned>(&self, query: &Query) -> Result<T, ExtractError> {
        self.extract_field(query.result_name())
    }

    /// Converts the result stored under `field`, whatever the query alias or name is.
    pub fn extract_field<T: DeserializeOwned>(&self, field: &str) -> Result<T, ExtractError> {
        let value = self.lookup(field)?;
        serde_json::from_value(value.clone()).map_err(|source| ExtractError::ResultMapping {
            field: field.to_string(),
            source,
        })
    }

    /// The result of `query` as it was received.
    pub fn extract_raw(&self, query: &Query) -> Result<&Value, ExtractError> {
        self.lookup(query.result_name())
    }

    /// The result of `query` as text: the content of a string result, the JSON text of
    /// anything else.
    pub fn extract_text(&self, query: &Query) -> Result<String, ExtractError> {
        Ok(canonical_text(self.lookup(query.result_name())?))
    }

    /// The results of a batch of queries, keyed by result name in the order of `queries`.
    pub fn extract_batch(&self, queries: &[Query]) -> Result<IndexMap<String, Value>, ExtractError> {
        self.check()?;

        let mut results = IndexMap::with_capacity(queries.len());
        for query in queries {
            let name = query.result_name();
            if results.contains_key(name) {
                return Err(ExtractError::DuplicateResultKey(name.to_string()));
            }
            let value = self.lookup(name)?.clone();
            results.insert(name.to_string(), value);
        }
        Ok(results)
    }

    fn lookup(&self, field: &str) -> Result<&Value, ExtractError> {
        self.check()?;
        self.data
            .as_ref()
            .and_then(|data| data.get(field))
            .ok_or_else(|| ExtractError::MissingResultField(field.to_string()))
    }
}

fn canonical_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl<'de> serde::Deserialize<'de> for GraphqlResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(GraphqlResponseVisitor)
    }
}

struct GraphqlResponseVisitor;

impl<'de> Visitor<'de> for GraphqlResponseVisitor {
    type Value = GraphqlResponse;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a valid GraphQL response")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut response = GraphqlResponse::default();
        while let Some(key) = map.next_key::<ResponseKey>()? {
            match key {
                ResponseKey::Data => response.data = map.next_value()?,
                ResponseKey::Errors => response.errors = map.next_value()?,
                ResponseKey::Unknown => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(response)
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum ResponseKey {
    Data,
    Errors,
    #[serde(other)]
    Unknown,
}
