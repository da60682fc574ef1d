use crate::api::types::{Article, Category, Headline};
use crate::config::FeedConfig;
use crate::feed::FetchParams;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Errors that can occur talking to the article backend.
///
/// The feed layer above draws no finer distinction than "the fetch
/// failed": timeouts, 4xx, 5xx, and undecodable bodies are all caught at
/// the call site, logged, and swallowed there. The variants exist so the
/// log lines say what actually went wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed base URL or endpoint path.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body could not be decoded as the expected JSON shape
    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct TrackReadBody {
    minutes_read: f64,
}

/// Thin client for the article backend's REST interface.
///
/// Holds a connection-pooled `reqwest::Client`, the parsed base URL, and
/// an optional bearer token attached to every request. Cloning is cheap
/// (the underlying client is reference-counted), so one `ApiClient` can
/// serve a feed session and an article loader at the same time.
///
/// No request timeout is configured here: the only bounded wait in this
/// subsystem is the loading-indicator debounce, which is a UI decision.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<SecretString>,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Url`] if `base_url` does not parse
    /// - [`ApiError::Network`] if the HTTP client cannot be constructed
    pub fn new(config: &FeedConfig) -> Result<Self, ApiError> {
        // Trailing slash so Url::join treats the base path as a directory
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base,
            token: config.api_token.clone().map(SecretString::from),
        })
    }

    /// Fetch one page of the home feed.
    ///
    /// `Explore` queries `/articles/home?page=&limit=`; named categories
    /// add `article_group=`. An empty or short list (length < requested
    /// limit) signals exhaustion to the caller.
    pub async fn home_page(
        &self,
        category: Category,
        params: FetchParams,
    ) -> Result<Vec<Article>, ApiError> {
        let mut url = self.base.join("articles/home")?;
        {
            let mut query = url.query_pairs_mut();
            if !category.is_explore() {
                query.append_pair("article_group", category.as_str());
            }
            query.append_pair("page", &params.page.to_string());
            query.append_pair("limit", &params.limit.to_string());
        }
        tracing::debug!(
            category = %category,
            page = params.page,
            limit = params.limit,
            "Fetching home feed page"
        );
        self.get_json(url).await
    }

    /// Fetch the externally curated "top stories" list.
    ///
    /// Used once per session to populate the headline exclusion set.
    pub async fn headlines(&self) -> Result<Vec<Headline>, ApiError> {
        let url = self.base.join("articles/home/headlines")?;
        self.get_json(url).await
    }

    /// Fetch a single full article by id.
    pub async fn article(&self, id: &str) -> Result<Article, ApiError> {
        let url = self.base.join(&format!("articles/{id}"))?;
        self.get_json(url).await
    }

    /// Record that an article was opened.
    pub async fn track_view(&self, id: &str) -> Result<(), ApiError> {
        let url = self.base.join(&format!("article/{id}/track/view"))?;
        self.post_discarding(self.http.post(url)).await
    }

    /// Record reading time for an article, in minutes.
    pub async fn track_read(&self, id: &str, minutes_read: f64) -> Result<(), ApiError> {
        let url = self.base.join(&format!("article/{id}/track/read"))?;
        let request = self.http.post(url).json(&TrackReadBody { minutes_read });
        self.post_discarding(request).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post_discarding(&self, mut request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> FeedConfig {
        FeedConfig {
            base_url: server.uri(),
            ..FeedConfig::default()
        }
    }

    fn article_json(id: &str) -> serde_json::Value {
        serde_json::json!({"_id": id, "article_group": "Politics"})
    }

    #[tokio::test]
    async fn test_home_page_explore_omits_article_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/home"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![article_json("a1")]))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        let articles = client
            .home_page(Category::Explore, FetchParams { page: 1, limit: 5 })
            .await
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "a1");

        // Explore must not send an article_group filter
        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].url.as_str().contains("article_group"));
    }

    #[tokio::test]
    async fn test_home_page_named_category_sends_article_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/home"))
            .and(query_param("article_group", "Politics"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        let articles = client
            .home_page(Category::Politics, FetchParams { page: 2, limit: 10 })
            .await
            .unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/home"))
            .and(header("Authorization", "Bearer sekrit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
            .expect(1)
            .mount(&server)
            .await;

        let config = FeedConfig {
            base_url: server.uri(),
            api_token: Some("sekrit".to_string()),
            ..FeedConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        client
            .home_page(Category::Explore, FetchParams { page: 1, limit: 5 })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_http_error_status_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/home"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        let result = client
            .home_page(Category::Explore, FetchParams { page: 1, limit: 5 })
            .await;
        match result.unwrap_err() {
            ApiError::HttpStatus(500) => {}
            e => panic!("Expected HttpStatus(500), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/home"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        let result = client
            .home_page(Category::Explore, FetchParams { page: 1, limit: 5 })
            .await;
        assert!(matches!(result.unwrap_err(), ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_headlines_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/home/headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"_id": "h1"},
                {"article_id": "h2"},
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        let headlines = client.headlines().await.unwrap();
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].article_id(), Some("h1"));
        assert_eq!(headlines[1].article_id(), Some("h2"));
    }

    #[tokio::test]
    async fn test_single_article_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/a42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(article_json("a42")))
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        let article = client.article("a42").await.unwrap();
        assert_eq!(article.id, "a42");
        assert_eq!(article.group, Some(Category::Politics));
    }

    #[tokio::test]
    async fn test_track_view_posts_to_tracking_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/article/a42/track/view"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        client.track_view("a42").await.unwrap();
    }

    #[tokio::test]
    async fn test_track_read_posts_minutes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/article/a42/track/read"))
            .and(wiremock::matchers::body_json(
                serde_json::json!({"minutes_read": 1.5}),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config_for(&server)).unwrap();
        client.track_read("a42", 1.5).await.unwrap();
    }

    #[tokio::test]
    async fn test_base_url_with_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/articles/home"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
            .expect(1)
            .mount(&server)
            .await;

        let config = FeedConfig {
            base_url: format!("{}/api/v1", server.uri()),
            ..FeedConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        client
            .home_page(Category::Explore, FetchParams { page: 1, limit: 5 })
            .await
            .unwrap();
    }
}
