//! Builds GraphQL query strings from typed selections and maps the responses back.
//!
//! A [`Query`] accumulates a name, an alias, arguments and a selection list, and renders them
//! with [`Query::build`]. [`QueryOf`] selects fields through the members of a [`Selectable`]
//! shape instead of strings. [`GraphqlResponse`] checks a response for errors and extracts the
//! result of each query, and [`QueryClient`] ties both ends to a [`Transport`].
//!
//! ```
//! use graphql_query_builder::{Enum, GraphqlResponse, Query};
//!
//! let query = Query::new("pokemon")
//!     .with_alias("Pikachu")
//!     .set_argument("name", "Pikachu")?
//!     .set_argument("form", Enum::new("NORMAL"))?
//!     .select("name");
//!
//! assert_eq!(
//!     query.build()?,
//!     "Pikachu:pokemon(name:\"Pikachu\", form:NORMAL){\n    name\n}"
//! );
//!
//! let response = GraphqlResponse::from_slice(br#"{"data":{"Pikachu":{"name":"Pikachu"}}}"#)?;
//! let name = response.extract_raw(&query)?["name"].clone();
//! assert_eq!(name, "Pikachu");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod error;
mod options;
mod query;
mod render;
mod response;
mod typed;
mod value;

#[cfg(feature = "reqwest")]
pub use client::HttpTransport;
pub use client::{GraphqlRequest, QueryClient, Transport};
pub use error::{BuildError, ClientError, ExtractError};
pub use options::{FieldCase, Formatter, QueryOptions};
pub use query::{Query, Selection};
pub use render::{QueryWriter, INDENT_SIZE};
pub use response::{GraphqlError, GraphqlResponse, Location};
pub use typed::{Member, MemberInfo, QueryOf, Selectable};
pub use value::{to_argument_value, ArgumentValue, Enum};
