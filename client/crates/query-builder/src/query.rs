use indexmap::IndexMap;

use crate::{error::BuildError, render::QueryWriter, value::ArgumentValue};

/// One entry of a selection list: a plain field or a nested query with its own selections.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(String),
    Query(Query),
}

impl From<&str> for Selection {
    fn from(field: &str) -> Self {
        Selection::Field(field.to_string())
    }
}

impl From<String> for Selection {
    fn from(field: String) -> Self {
        Selection::Field(field)
    }
}

impl From<Query> for Selection {
    fn from(query: Query) -> Self {
        Selection::Query(query)
    }
}

/// A GraphQL query node: name, alias, arguments and selected fields.
///
/// Queries are built by value, every call consuming the query and handing it back:
///
/// ```
/// use graphql_query_builder::Query;
///
/// let query = Query::new("pokemon")
///     .set_argument("name", "pikachu")?
///     .select("name");
///
/// assert_eq!(query.build()?, "pokemon(name:\"pikachu\"){\n    name\n}");
/// # Ok::<(), graphql_query_builder::BuildError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    name: String,
    alias: Option<String>,
    comment: Option<String>,
    raw: Option<String>,
    selections: Vec<Selection>,
    arguments: IndexMap<String, ArgumentValue>,
    batch: Vec<Query>,
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl Query {
    pub fn new(name: impl Into<String>) -> Self {
        Query {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn raw_query(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn arguments(&self) -> &IndexMap<String, ArgumentValue> {
        &self.arguments
    }

    pub fn batch_queries(&self) -> &[Query] {
        &self.batch
    }

    /// Key under which the result of this query appears in the response data: the alias when
    /// set, the name otherwise.
    pub fn result_name(&self) -> &str {
        self.alias().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the alias, a blank alias removes it.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_blank(alias.into());
        self
    }

    /// Comment written at the top of the selection block, one `#` line per line of text.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment: String = comment.into();
        self.comment = (!comment.is_empty()).then_some(comment);
        self
    }

    #[must_use]
    pub fn select(mut self, field: impl Into<String>) -> Self {
        self.selections.push(Selection::Field(field.into()));
        self
    }

    #[must_use]
    pub fn select_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.selections
            .extend(fields.into_iter().map(|field| Selection::Field(field.into())));
        self
    }

    /// Adds a nested query to the selection list. It must have a name.
    pub fn select_query(mut self, sub_query: Query) -> Result<Self, BuildError> {
        if sub_query.name.trim().is_empty() {
            return Err(BuildError::UnnamedSubQuery);
        }
        self.selections.push(Selection::Query(sub_query));
        Ok(self)
    }

    /// Adds a mix of fields and nested queries, in order.
    pub fn select_all<I>(self, selections: I) -> Result<Self, BuildError>
    where
        I: IntoIterator,
        I::Item: Into<Selection>,
    {
        selections
            .into_iter()
            .try_fold(self, |query, selection| match Into::<Selection>::into(selection) {
                Selection::Field(field) => Ok(query.select(field)),
                Selection::Query(sub_query) => query.select_query(sub_query),
            })
    }

    pub fn set_argument(mut self, key: impl Into<String>, value: impl Into<ArgumentValue>) -> Result<Self, BuildError> {
        self.insert_argument(key.into(), value.into())?;
        Ok(self)
    }

    pub fn set_arguments<I, K, V>(mut self, arguments: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        for (key, value) in arguments {
            self.insert_argument(key.into(), value.into())?;
        }
        Ok(self)
    }

    pub(crate) fn insert_argument(&mut self, key: String, value: ArgumentValue) -> Result<(), BuildError> {
        match self.arguments.entry(key) {
            indexmap::map::Entry::Occupied(entry) => Err(BuildError::DuplicateArgumentKey(entry.key().clone())),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Appends a query rendered right after this one, outside of its braces.
    #[must_use]
    pub fn batch(mut self, query: Query) -> Self {
        self.batch.push(query);
        self
    }

    /// Replaces the whole generated body by `raw`.
    ///
    /// This resets the query first: name, alias, comment, arguments, selections and batched
    /// queries set before are all discarded. If the first non-whitespace character is `{`, that
    /// brace and the last `}` are removed, whitespace around them is kept as is.
    #[must_use]
    pub fn raw(mut self, raw: impl Into<String>) -> Self {
        self.clear();
        self.raw = non_blank(strip_outer_braces(raw.into()));
        self
    }

    /// Resets the query to its empty state.
    pub fn clear(&mut self) {
        *self = Query::default();
    }

    /// Renders the query, followed by every batched query.
    ///
    /// Without a raw body the query must have a name and at least one selected field.
    pub fn build(&self) -> Result<String, BuildError> {
        let mut writer = QueryWriter::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_string())
    }

    fn write_to(&self, writer: &mut QueryWriter) -> Result<(), BuildError> {
        match &self.raw {
            Some(raw) => writer.write_raw(raw),
            None => {
                if self.name.trim().is_empty() {
                    return Err(BuildError::MissingName);
                }
                if self.selections.is_empty() {
                    return Err(BuildError::EmptySelection(self.name.clone()));
                }
                writer.write_query(self, 0)?;
            }
        }

        for query in &self.batch {
            query.write_to(writer)?;
        }
        Ok(())
    }
}

fn strip_outer_braces(mut raw: String) -> String {
    if raw.trim_start().starts_with('{') {
        if let (Some(open), Some(close)) = (raw.find('{'), raw.rfind('}')) {
            if open < close {
                raw.remove(close);
                raw.remove(open);
            }
        }
    }
    raw
}
