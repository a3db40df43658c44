use url::Url;

use super::{GraphqlRequest, Transport};
use crate::response::GraphqlResponse;

/// HTTP transport: GET requests carry the query in the `query` URL parameter, POST requests
/// send it as a JSON body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
}

impl HttpTransport {
    pub fn new(url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        HttpTransport { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn get_request(&self, request: &GraphqlRequest) -> reqwest::RequestBuilder {
        self.client.get(self.url.clone()).query(request)
    }

    fn post_request(&self, request: &GraphqlRequest) -> reqwest::RequestBuilder {
        self.client.post(self.url.clone()).json(request)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    type Error = reqwest::Error;

    async fn get(&self, request: GraphqlRequest) -> Result<GraphqlResponse, Self::Error> {
        // GraphQL servers report request errors in the body, whatever the status code.
        self.get_request(&request).send().await?.json().await
    }

    async fn post(&self, request: GraphqlRequest) -> Result<GraphqlResponse, Self::Error> {
        self.post_request(&request).send().await?.json().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> HttpTransport {
        HttpTransport::new(Url::parse("http://localhost:4000/graphql").unwrap())
    }

    fn request() -> GraphqlRequest {
        GraphqlRequest {
            query: "{pokemon(name:\"Pikachu\"){\n    name\n}}".into(),
        }
    }

    #[test]
    fn get_sends_the_query_as_url_parameter() {
        let request = transport().get_request(&request()).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/graphql");

        let pairs = request.url().query_pairs().into_owned().collect::<Vec<_>>();
        assert_eq!(
            pairs,
            [("query".to_string(), "{pokemon(name:\"Pikachu\"){\n    name\n}}".to_string())]
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn post_sends_a_json_body() {
        let request = transport().post_request(&request()).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().query(), None);
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );

        let body = request.body().and_then(|body| body.as_bytes()).unwrap();
        insta::assert_snapshot!(std::str::from_utf8(body).unwrap(), @r###"{"query":"{pokemon(name:\"Pikachu\"){\n    name\n}}"}"###);
    }
}
