mod macros;

use std::{any::type_name, marker::PhantomData};

use crate::{
    error::BuildError,
    options::QueryOptions,
    query::Query,
    value::{to_argument_value, ArgumentValue},
};

/// Static description of a member of a [`Selectable`] shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberInfo {
    pub name: &'static str,
    /// Explicit GraphQL name, bypasses the naming strategy.
    pub rename: Option<&'static str>,
}

impl MemberInfo {
    pub const fn new(name: &'static str, rename: Option<&'static str>) -> Self {
        MemberInfo { name, rename }
    }
}

/// A selectable member, typed by the shape of its value so that sub-selections can be
/// expressed on that shape. List members are typed by their element shape.
pub struct Member<T: ?Sized> {
    info: MemberInfo,
    _shape: PhantomData<fn() -> T>,
}

impl<T: ?Sized> Member<T> {
    pub const fn new(name: &'static str, rename: Option<&'static str>) -> Self {
        Member {
            info: MemberInfo::new(name, rename),
            _shape: PhantomData,
        }
    }

    pub fn info(&self) -> MemberInfo {
        self.info
    }
}

impl<T: ?Sized> Clone for Member<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Member<T> {}

impl<T: ?Sized> std::fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Member").field(&self.info).finish()
    }
}

/// A shape whose members can be selected by reference rather than by name.
///
/// Usually implemented with the [`selectable!`](crate::selectable) macro.
pub trait Selectable {
    /// One [`Member`] per member of the shape, handed to the selector closures.
    type Fields;

    fn fields() -> Self::Fields;

    fn members() -> &'static [MemberInfo];
}

/// A [`Query`] whose fields are selected through the members of `T`.
///
/// ```
/// use graphql_query_builder::{selectable, FieldCase, QueryOf, QueryOptions};
///
/// struct Pokemon;
/// struct Dimension;
///
/// selectable! {
///     Pokemon => pub struct PokemonFields {
///         id: String,
///         max_hp: i32,
///         height: Dimension,
///     }
/// }
///
/// selectable! {
///     Dimension => pub struct DimensionFields {
///         minimum: String,
///         maximum: String,
///     }
/// }
///
/// let query = QueryOf::<Pokemon>::with_options("pokemon", QueryOptions::new().with_field_case(FieldCase::Camel))
///     .select(|p| p.id)?
///     .select(|p| p.max_hp)?
///     .sub_select(|p| p.height, |q| q.select(|h| h.minimum)?.select(|h| h.maximum))?;
///
/// assert_eq!(
///     query.build()?,
///     "pokemon{\n    id\n    maxHp\n    height{\n        minimum\n        maximum\n    }\n}"
/// );
/// # Ok::<(), graphql_query_builder::BuildError>(())
/// ```
pub struct QueryOf<T: ?Sized> {
    query: Query,
    options: QueryOptions,
    _shape: PhantomData<fn() -> T>,
}

impl<T: ?Sized> Clone for QueryOf<T> {
    fn clone(&self) -> Self {
        QueryOf {
            query: self.query.clone(),
            options: self.options.clone(),
            _shape: PhantomData,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for QueryOf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOf")
            .field("shape", &type_name::<T>())
            .field("query", &self.query)
            .field("options", &self.options)
            .finish()
    }
}

impl<T: Selectable + ?Sized> QueryOf<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, QueryOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: QueryOptions) -> Self {
        QueryOf {
            query: Query::new(name),
            options,
            _shape: PhantomData,
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn into_query(self) -> Query {
        self.query
    }

    pub fn result_name(&self) -> &str {
        self.query.result_name()
    }

    pub fn build(&self) -> Result<String, BuildError> {
        self.query.build()
    }

    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.map(|query| query.with_name(name))
    }

    #[must_use]
    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        self.map(|query| query.with_alias(alias))
    }

    #[must_use]
    pub fn with_comment(self, comment: impl Into<String>) -> Self {
        self.map(|query| query.with_comment(comment))
    }

    /// See [`Query::raw`]: everything configured before is discarded.
    #[must_use]
    pub fn raw(self, raw: impl Into<String>) -> Self {
        self.map(|query| query.raw(raw))
    }

    #[must_use]
    pub fn batch(self, query: impl Into<Query>) -> Self {
        self.map(|this| this.batch(query.into()))
    }

    /// Selects a field by name, for fields not declared on `T`.
    #[must_use]
    pub fn select_field(self, field: impl Into<String>) -> Self {
        self.map(|query| query.select(field))
    }

    /// Selects the member returned by `selector`.
    pub fn select<U: ?Sized>(self, selector: impl FnOnce(&T::Fields) -> Member<U>) -> Result<Self, BuildError> {
        let name = self.resolve_member(selector(&T::fields()))?;
        Ok(self.map(|query| query.select(name)))
    }

    /// Selects the member returned by `selector` with a sub-selection built by `configure`.
    ///
    /// The sub-query shares the naming strategy of this query.
    pub fn sub_select<U: Selectable + ?Sized>(
        self,
        selector: impl FnOnce(&T::Fields) -> Member<U>,
        configure: impl FnOnce(QueryOf<U>) -> Result<QueryOf<U>, BuildError>,
    ) -> Result<Self, BuildError> {
        let name = self.resolve_member(selector(&T::fields()))?;
        let sub_query = configure(QueryOf::with_options(name, self.options.clone()))?;
        let QueryOf { query, options, .. } = self;
        Ok(QueryOf {
            query: query.select_query(sub_query.query)?,
            options,
            _shape: PhantomData,
        })
    }

    pub fn set_argument(mut self, key: impl Into<String>, value: impl Into<ArgumentValue>) -> Result<Self, BuildError> {
        self.query.insert_argument(key.into(), value.into())?;
        Ok(self)
    }

    pub fn set_arguments<I, K, V>(mut self, arguments: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        for (key, value) in arguments {
            self.query.insert_argument(key.into(), value.into())?;
        }
        Ok(self)
    }

    /// Adds one argument per member of `arguments`.
    ///
    /// A member declared on `A` is named like a selected field: its explicit name if it has
    /// one, otherwise its member name through the naming strategy of this query. A key that
    /// matches no declared member was renamed by serde and is kept as is.
    pub fn set_arguments_from<A>(mut self, arguments: &A) -> Result<Self, BuildError>
    where
        A: serde::Serialize + Selectable + ?Sized,
    {
        let ArgumentValue::Object(fields) = to_argument_value(arguments)? else {
            return Err(BuildError::UnsupportedValueType(format!(
                "{} (expected a struct)",
                type_name::<A>()
            )));
        };
        for (key, value) in fields {
            let key = match A::members().iter().find(|info| info.name == key) {
                Some(info) => self.options.resolve_name(info.name, info.rename),
                None => key,
            };
            self.query.insert_argument(key, value)?;
        }
        Ok(self)
    }

    fn resolve_member<U: ?Sized>(&self, member: Member<U>) -> Result<String, BuildError> {
        let info = member.info();
        if info.name.is_empty() {
            return Err(BuildError::ArgumentRequired);
        }
        if !T::members().contains(&info) {
            return Err(BuildError::InvalidMemberSelector {
                shape: type_name::<T>(),
                member: info.name.to_string(),
            });
        }
        Ok(self.options.resolve_name(info.name, info.rename))
    }

    fn map(self, f: impl FnOnce(Query) -> Query) -> Self {
        QueryOf {
            query: f(self.query),
            options: self.options,
            _shape: PhantomData,
        }
    }
}

impl<T: ?Sized> From<QueryOf<T>> for Query {
    fn from(query: QueryOf<T>) -> Self {
        query.query
    }
}

impl<T: ?Sized> AsRef<Query> for QueryOf<T> {
    fn as_ref(&self) -> &Query {
        &self.query
    }
}
