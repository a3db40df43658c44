#[cfg(feature = "reqwest")]
mod http;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(feature = "reqwest")]
pub use http::HttpTransport;

use crate::{
    error::{BuildError, ClientError},
    query::Query,
    response::GraphqlResponse,
};

/// Body of a GraphQL request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GraphqlRequest {
    pub query: String,
}

impl GraphqlRequest {
    /// Builds every query and wraps them, back to back, in a single `{ }` block.
    pub fn from_queries<'a>(queries: impl IntoIterator<Item = &'a Query>) -> Result<Self, BuildError> {
        let mut query = String::from("{");
        for item in queries {
            query.push_str(&item.build()?);
        }
        query.push('}');
        tracing::debug!("GraphQL request\n{query}");
        Ok(GraphqlRequest { query })
    }
}

/// Sends requests to a GraphQL server and parses its responses.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends the request with read-only semantics, for queries.
    async fn get(&self, request: GraphqlRequest) -> Result<GraphqlResponse, Self::Error>;

    /// Sends the request with write semantics, for mutations.
    async fn post(&self, request: GraphqlRequest) -> Result<GraphqlResponse, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

/// Builds queries, sends them through a [`Transport`] and extracts their results.
///
/// Any error reported by the server fails the call, even if some data was returned.
#[derive(Debug, Clone)]
pub struct QueryClient<T> {
    transport: T,
}

impl<T: Transport> QueryClient<T> {
    pub fn new(transport: T) -> Self {
        QueryClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R: DeserializeOwned>(&self, query: &Query) -> Result<R, ClientError> {
        let response = self.send(Method::Get, std::slice::from_ref(query)).await?;
        Ok(response.extract(query)?)
    }

    pub async fn post<R: DeserializeOwned>(&self, query: &Query) -> Result<R, ClientError> {
        let response = self.send(Method::Post, std::slice::from_ref(query)).await?;
        Ok(response.extract(query)?)
    }

    /// Like [`QueryClient::get`], returning the result as text.
    pub async fn get_text(&self, query: &Query) -> Result<String, ClientError> {
        let response = self.send(Method::Get, std::slice::from_ref(query)).await?;
        Ok(response.extract_text(query)?)
    }

    /// Like [`QueryClient::post`], returning the result as text.
    pub async fn post_text(&self, query: &Query) -> Result<String, ClientError> {
        let response = self.send(Method::Post, std::slice::from_ref(query)).await?;
        Ok(response.extract_text(query)?)
    }

    /// Sends all queries in one request, results are keyed by alias or name.
    pub async fn get_batch(&self, queries: &[Query]) -> Result<IndexMap<String, Value>, ClientError> {
        let response = self.send(Method::Get, queries).await?;
        Ok(response.extract_batch(queries)?)
    }

    pub async fn post_batch(&self, queries: &[Query]) -> Result<IndexMap<String, Value>, ClientError> {
        let response = self.send(Method::Post, queries).await?;
        Ok(response.extract_batch(queries)?)
    }

    #[tracing::instrument(skip_all, fields(method = ?method, queries = queries.len()))]
    async fn send(&self, method: Method, queries: &[Query]) -> Result<GraphqlResponse, ClientError> {
        let request = GraphqlRequest::from_queries(queries)?;
        let result = match method {
            Method::Get => self.transport.get(request).await,
            Method::Post => self.transport.post(request).await,
        };
        result.map_err(|err| ClientError::Transport(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::{error::ExtractError, selectable, QueryOf};

    #[derive(Default)]
    struct StaticTransport {
        response: Value,
        requests: Mutex<Vec<(Method, String)>>,
    }

    impl StaticTransport {
        fn new(response: Value) -> Self {
            StaticTransport {
                response,
                ..Default::default()
            }
        }

        fn respond(&self, method: Method, request: GraphqlRequest) -> Result<GraphqlResponse, serde_json::Error> {
            self.requests.lock().unwrap().push((method, request.query));
            serde_json::from_value(self.response.clone())
        }
    }

    #[async_trait::async_trait]
    impl Transport for StaticTransport {
        type Error = serde_json::Error;

        async fn get(&self, request: GraphqlRequest) -> Result<GraphqlResponse, Self::Error> {
            self.respond(Method::Get, request)
        }

        async fn post(&self, request: GraphqlRequest) -> Result<GraphqlResponse, Self::Error> {
            self.respond(Method::Post, request)
        }
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Pokemon {
        id: String,
        name: String,
    }

    selectable! {
        Pokemon => struct PokemonFields {
            id: String,
            name: String,
        }
    }

    fn pokemon(name: &str) -> Query {
        QueryOf::<Pokemon>::new("pokemon")
            .with_alias(name)
            .set_argument("name", name)
            .unwrap()
            .select(|p| p.id)
            .unwrap()
            .select(|p| p.name)
            .unwrap()
            .into()
    }

    #[test]
    fn request_wraps_queries() {
        let request = GraphqlRequest::from_queries(&[pokemon("Pikachu"), pokemon("Bulbasaur")]).unwrap();
        insta::assert_snapshot!(request.query, @r###"
        {Pikachu:pokemon(name:"Pikachu"){
            id
            name
        }Bulbasaur:pokemon(name:"Bulbasaur"){
            id
            name
        }}
        "###);

        let err = GraphqlRequest::from_queries(&[Query::new("pokemon")]).unwrap_err();
        assert_eq!(err, BuildError::EmptySelection("pokemon".into()));
    }

    #[tokio::test]
    async fn get_single() {
        let client = QueryClient::new(StaticTransport::new(json!({
            "data": {"Pikachu": {"id": "UG9rZW1vbjowMjU=", "name": "Pikachu"}}
        })));

        let pikachu: Pokemon = client.get(&pokemon("Pikachu")).await.unwrap();
        assert_eq!(
            pikachu,
            Pokemon {
                id: "UG9rZW1vbjowMjU=".into(),
                name: "Pikachu".into()
            }
        );

        let text = client.post_text(&pokemon("Pikachu")).await.unwrap();
        assert_eq!(text, r#"{"id":"UG9rZW1vbjowMjU=","name":"Pikachu"}"#);

        let requests = client.transport().requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, Method::Get);
        assert_eq!(requests[1].0, Method::Post);
        assert!(requests[0].1.starts_with("{Pikachu:pokemon(name:\"Pikachu\"){"));
    }

    #[tokio::test]
    async fn batch() {
        let client = QueryClient::new(StaticTransport::new(json!({
            "data": {
                "Pikachu": {"id": "UG9rZW1vbjowMjU=", "name": "Pikachu"},
                "Bulbasaur": {"id": "UG9rZW1vbjowMDE=", "name": "Bulbasaur"}
            }
        })));

        let results = client
            .post_batch(&[pokemon("Pikachu"), pokemon("Bulbasaur")])
            .await
            .unwrap();
        let names = results
            .values()
            .map(|value| serde_json::from_value::<Pokemon>(value.clone()).unwrap().name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Pikachu", "Bulbasaur"]);

        let results = client.get_batch(&[pokemon("Pikachu")]).await.unwrap();
        assert_eq!(results.keys().collect::<Vec<_>>(), ["Pikachu"]);
    }

    #[tokio::test]
    async fn response_errors_fail_the_call() {
        let client = QueryClient::new(StaticTransport::new(json!({
            "data": {"Pikachu": {"id": "UG9rZW1vbjowMjU=", "name": "Pikachu"}},
            "errors": [{"message": "Bulbasaur not found", "path": ["Bulbasaur"]}]
        })));

        let err = client
            .get_batch(&[pokemon("Pikachu"), pokemon("Bulbasaur")])
            .await
            .unwrap_err();
        match err {
            ClientError::Extract(ExtractError::Request(errors)) => {
                assert_eq!(errors[0].message, "Bulbasaur not found");
            }
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn build_errors_are_not_sent() {
        let client = QueryClient::new(StaticTransport::new(json!({"data": {}})));
        let err = client.get::<Value>(&Query::default().select("id")).await.unwrap_err();
        assert!(matches!(err, ClientError::Build(BuildError::MissingName)));
        assert!(client.transport().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_errors() {
        let client = QueryClient::new(StaticTransport::new(json!("not a response")));
        let err = client.get::<Value>(&pokemon("Pikachu")).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
