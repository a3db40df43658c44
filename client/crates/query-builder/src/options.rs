use std::{fmt, sync::Arc};

use convert_case::{Case, Casing};

/// Function turning a Rust member name into a GraphQL field or argument name.
pub type Formatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Casing applied to member names when no explicit name was declared for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCase {
    Verbatim,
    Camel,
    Pascal,
    Snake,
    Kebab,
}

impl FieldCase {
    pub fn apply(self, name: &str) -> String {
        match self {
            FieldCase::Verbatim => name.to_string(),
            FieldCase::Camel => name.to_case(Case::Camel),
            FieldCase::Pascal => name.to_case(Case::Pascal),
            FieldCase::Snake => name.to_case(Case::Snake),
            FieldCase::Kebab => name.to_case(Case::Kebab),
        }
    }
}

/// Naming strategy shared by a typed query and all of its sub-queries.
///
/// A member's explicit name always wins. Otherwise the formatter is used if one was given,
/// then the configured `field_case`, and finally the member name itself.
#[derive(Clone, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryOptions {
    pub field_case: Option<FieldCase>,
    #[serde(skip)]
    formatter: Option<Formatter>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_case(mut self, field_case: FieldCase) -> Self {
        self.field_case = Some(field_case);
        self
    }

    pub fn with_formatter(mut self, formatter: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn format_name(&self, name: &str) -> String {
        if let Some(formatter) = &self.formatter {
            formatter(name)
        } else if let Some(field_case) = self.field_case {
            field_case.apply(name)
        } else {
            name.to_string()
        }
    }

    /// Name of a member given its optional explicit name.
    pub fn resolve_name(&self, name: &str, rename: Option<&str>) -> String {
        match rename {
            Some(rename) if !rename.is_empty() => rename.to_string(),
            _ => self.format_name(name),
        }
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("field_case", &self.field_case)
            .field("formatter", &self.formatter.as_ref().map(|_| "Fn(&str) -> String"))
            .finish()
    }
}
