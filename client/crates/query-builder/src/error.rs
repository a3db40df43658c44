use crate::response::GraphqlError;

/// Failures raised while configuring or rendering a query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("Must have a `name` specified in the query")]
    MissingName,
    #[error("Must have one or more selected fields in the query `{0}`")]
    EmptySelection(String),
    #[error("Sub-selections must have a `name` set")]
    UnnamedSubQuery,
    #[error("Argument `{0}` is already set")]
    DuplicateArgumentKey(String),
    #[error("Member `{member}` is not declared on `{shape}`")]
    InvalidMemberSelector { shape: &'static str, member: String },
    #[error("A member selector is required")]
    ArgumentRequired,
    #[error("Unsupported argument value, type found: {0}")]
    UnsupportedValueType(String),
}

impl BuildError {
    /// Whether the error comes from an invalid query configuration rather than an
    /// argument the renderer cannot express.
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, BuildError::UnsupportedValueType(_))
    }
}

impl serde::ser::Error for BuildError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        BuildError::UnsupportedValueType(msg.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("{}", request_errors_message(.0))]
    Request(Vec<GraphqlError>),
    #[error("The response data has no field named `{0}`")]
    MissingResultField(String),
    #[error("Result key `{0}` is used by more than one query of the batch")]
    DuplicateResultKey(String),
    #[error("Failed to map the result `{field}`: {source}")]
    ResultMapping {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractError {
    /// The protocol errors carried by the response, if that is what failed.
    pub fn graphql_errors(&self) -> &[GraphqlError] {
        match self {
            ExtractError::Request(errors) => errors,
            _ => &[],
        }
    }
}

fn request_errors_message(errors: &[GraphqlError]) -> String {
    let mut message = String::from("The GraphQL request returns errors.");
    for error in errors {
        message.push('\n');
        message.push_str(&error.message);
    }
    message
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("Transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_lists_every_message() {
        let error = ExtractError::Request(vec![GraphqlError::new("first"), GraphqlError::new("second")]);
        insta::assert_snapshot!(error, @r###"
        The GraphQL request returns errors.
        first
        second
        "###);
        assert_eq!(error.graphql_errors().len(), 2);
    }

    #[test]
    fn validation_errors() {
        assert!(BuildError::MissingName.is_validation_error());
        assert!(BuildError::DuplicateArgumentKey("limit".into()).is_validation_error());
        assert!(!BuildError::UnsupportedValueType("f64".into()).is_validation_error());
    }
}
