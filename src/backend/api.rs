//! HTTP client for the Rythm'it backend API

use reqwest::{Client, Url};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{ApiEnvelope, SearchData, TagInfo, ThreadSummary};
use crate::config::Config;
use crate::error::ApiError;
use crate::search::query::{compose, Composition, SearchQuery};
use crate::search::{SearchOutcome, TagSelection};

pub const SEARCH_PATH: &str = "/api/public/threads/search";
pub const TAGS_PATH: &str = "/api/public/tags";

/// Backend accepts `limit` in 1..=50.
const MAX_RESULT_LIMIT: u32 = 50;

/// Client for the public thread search and tag catalogue routes
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    result_limit: Option<u32>,
}

/// What happened when the shell asked for a search.
#[derive(Debug)]
pub enum SearchAttempt {
    /// Nothing to search for; no request was built.
    Rejected,
    Pending(PendingSearch),
}

/// A validated search that has not been sent yet.
///
/// Owns a client handle so the request future is `'static` and can be
/// handed to the UI runtime.
#[derive(Debug)]
pub struct PendingSearch {
    client: BackendClient,
    query: SearchQuery,
    request_id: Uuid,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            result_limit: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Transport { message: e.to_string() })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            result_limit: config.result_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate the prompt against the selection without touching the network.
    pub fn prepare_search(&self, raw_text: &str, selection: &TagSelection) -> SearchAttempt {
        match compose(raw_text, selection) {
            Composition::Rejected => {
                tracing::warn!("Search rejected: empty text and no tags selected");
                SearchAttempt::Rejected
            }
            Composition::Ready(query) => SearchAttempt::Pending(PendingSearch {
                client: self.clone(),
                query,
                request_id: Uuid::new_v4(),
            }),
        }
    }

    /// Full URL for `query`, e.g. `/api/public/threads/search?q=synth&tags=retro`.
    pub fn search_url(&self, query: &SearchQuery) -> Result<Url, ApiError> {
        let mut url = self.endpoint(SEARCH_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
            if let Some(limit) = self.result_limit {
                pairs.append_pair("limit", &limit.clamp(1, MAX_RESULT_LIMIT).to_string());
            }
        }
        Ok(url)
    }

    /// Run one search and classify the result. Never returns an error;
    /// failures become [`SearchOutcome::Failure`].
    pub async fn search_threads(&self, query: &SearchQuery) -> SearchOutcome {
        let envelope = match self.search_url(query) {
            Ok(url) => self.fetch_search(url).await,
            Err(err) => Err(err),
        };

        match envelope {
            Ok(envelope) => {
                if !envelope.success {
                    let reason = envelope.error.or(envelope.message).unwrap_or_default();
                    tracing::warn!("Search envelope reported failure: {}", reason);
                }
                let threads = envelope
                    .data
                    .and_then(|data| data.threads)
                    .map(|threads| threads.into_iter().map(ThreadSummary::from).collect());
                let outcome = SearchOutcome::from_envelope(envelope.success, threads);
                tracing::info!("Search for {} returned {} thread(s)", query.headline(), outcome.thread_count());
                outcome
            }
            Err(err) => {
                tracing::error!(kind = err.kind(), "Search for {} failed: {}", query.headline(), err);
                SearchOutcome::Failure(err)
            }
        }
    }

    /// Fetch the selectable tag catalogue
    pub async fn list_tags(&self) -> Result<Vec<TagInfo>, ApiError> {
        let url = self.endpoint(TAGS_PATH)?;
        let envelope: ApiEnvelope<Vec<TagInfo>> = self.get_envelope(url).await?;
        if !envelope.success {
            tracing::warn!("Tag catalogue request reported failure");
        }
        let tags = if envelope.success { envelope.data.unwrap_or_default() } else { Vec::new() };
        tracing::info!("Loaded {} tags", tags.len());
        Ok(tags)
    }

    async fn fetch_search(&self, url: Url) -> Result<ApiEnvelope<SearchData>, ApiError> {
        self.get_envelope(url).await
    }

    async fn get_envelope<T>(&self, url: Url) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message: if body.is_empty() { status.to_string() } else { body },
            });
        }

        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed { message: e.to_string() })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::InvalidUrl { message: e.to_string() })
    }
}

impl PendingSearch {
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Send the request. Superseded searches are not cancelled; whichever
    /// response the caller applies last is what gets displayed.
    pub async fn send(self) -> SearchOutcome {
        let span = tracing::info_span!("thread_search", request_id = %self.request_id);
        async move { self.client.search_threads(&self.query).await }
            .instrument(span)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::render::{render, DisplayRecord};
    use axum::{extract::{RawQuery, State}, http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-process stand-in for the backend.
    #[derive(Clone)]
    struct MockBackend {
        status: StatusCode,
        body: &'static str,
        hits: Arc<AtomicUsize>,
        queries: Arc<Mutex<Vec<String>>>,
    }

    impl MockBackend {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        fn last_query(&self) -> String {
            self.queries.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    async fn respond(State(mock): State<MockBackend>, RawQuery(query): RawQuery) -> (StatusCode, String) {
        mock.hits.fetch_add(1, Ordering::SeqCst);
        mock.queries.lock().unwrap().push(query.unwrap_or_default());
        (mock.status, mock.body.to_string())
    }

    async fn spawn_backend(status: StatusCode, body: &'static str) -> (BackendClient, MockBackend) {
        let mock = MockBackend {
            status,
            body,
            hits: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route(SEARCH_PATH, get(respond))
            .route(TAGS_PATH, get(respond))
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (BackendClient::new(&format!("http://{}", addr)), mock)
    }

    fn selection(tags: &[&str]) -> TagSelection {
        let mut selection = TagSelection::new();
        for tag in tags {
            selection.add(tag);
        }
        selection
    }

    async fn run(client: &BackendClient, text: &str, tags: &[&str]) -> SearchOutcome {
        match client.prepare_search(text, &selection(tags)) {
            SearchAttempt::Pending(pending) => pending.send().await,
            SearchAttempt::Rejected => panic!("Expected a pending search"),
        }
    }

    const THREE_THREADS: &str = r#"{
        "success": true,
        "message": "Recherche effectuée",
        "data": {
            "threads": [
                {"id": 1, "title": "One", "content": "first", "author": "alice",
                 "created_at": "2024-01-01T10:00:00Z", "likes": 3, "comments": 1, "tags": ["retro"]},
                {"id": 2, "title": "Two", "content": "second", "author": "bob",
                 "created_at": "2024-01-02T10:00:00Z", "likes": 0, "comments": 0, "tags": []},
                {"id": 3, "title": "Three", "content": "third", "author": "c",
                 "created_at": "2024-01-03T10:00:00Z", "likes": 9, "comments": 4, "tags": ["synthwave"]}
            ],
            "count": 3, "total": 3
        }
    }"#;

    #[tokio::test]
    async fn test_text_and_tag_query_string() {
        let (client, mock) = spawn_backend(StatusCode::OK, r#"{"success": true, "data": {"threads": []}}"#).await;
        run(&client, "synth", &["retro"]).await;
        assert!(mock.last_query().contains("q=synth&tags=retro"));
    }

    #[tokio::test]
    async fn test_tags_only_query_string_omits_q() {
        let (client, mock) = spawn_backend(StatusCode::OK, r#"{"success": true, "data": {"threads": []}}"#).await;
        run(&client, "", &["a", "b"]).await;

        let query = mock.last_query();
        assert_eq!(query, "tags=a%2Cb");
        assert!(!query.contains("q="));
    }

    #[tokio::test]
    async fn test_rejected_search_sends_nothing() {
        let (client, mock) = spawn_backend(StatusCode::OK, r#"{"success": true}"#).await;
        let attempt = client.prepare_search("   ", &TagSelection::new());
        assert!(matches!(attempt, SearchAttempt::Rejected));
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_empty_thread_list_is_empty_not_failure() {
        let (client, mock) = spawn_backend(StatusCode::OK, r#"{"success": true, "data": {"threads": []}}"#).await;
        let outcome = run(&client, "nothing", &[]).await;
        assert_eq!(outcome, SearchOutcome::Empty);
        assert_eq!(mock.hits(), 1);
    }

    #[tokio::test]
    async fn test_missing_threads_and_unsuccessful_envelope_are_empty() {
        let (client, _mock) = spawn_backend(StatusCode::OK, r#"{"success": true, "data": {}}"#).await;
        assert_eq!(run(&client, "x", &[]).await, SearchOutcome::Empty);

        let (client, _mock) =
            spawn_backend(StatusCode::OK, r#"{"success": false, "error": "nope"}"#).await;
        assert_eq!(run(&client, "x", &[]).await, SearchOutcome::Empty);
    }

    #[tokio::test]
    async fn test_http_500_is_failure_and_renders_error() {
        let (client, _mock) = spawn_backend(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success": false, "error": "Erreur lors de la recherche"}"#,
        )
        .await;

        let pending = match client.prepare_search("synth", &TagSelection::new()) {
            SearchAttempt::Pending(pending) => pending,
            SearchAttempt::Rejected => panic!("Expected a pending search"),
        };
        let query = pending.query().clone();
        let outcome = pending.send().await;

        match &outcome {
            SearchOutcome::Failure(ApiError::HttpStatus { status, .. }) => assert_eq!(*status, 500),
            other => panic!("Expected HTTP failure, got {:?}", other),
        }

        let records = render(&outcome, &query, chrono::Utc::now());
        assert_eq!(records.len(), 1);
        assert!(records[0].is_error());
    }

    #[tokio::test]
    async fn test_malformed_json_is_distinguishable() {
        let (client, _mock) = spawn_backend(StatusCode::OK, "<html>oops</html>").await;
        match run(&client, "synth", &[]).await {
            SearchOutcome::Failure(err) => {
                assert!(err.is_malformed());
                assert_eq!(err.kind(), "malformed");
            }
            other => panic!("Expected Failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BackendClient::new(&format!("http://{}", addr));
        match run(&client, "synth", &[]).await {
            SearchOutcome::Failure(err) => {
                assert_eq!(err.kind(), "transport");
                assert!(!err.is_malformed());
            }
            other => panic!("Expected Failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_three_threads_render_three_cards() {
        let (client, _mock) = spawn_backend(StatusCode::OK, THREE_THREADS).await;
        let pending = match client.prepare_search("", &selection(&["retro"])) {
            SearchAttempt::Pending(pending) => pending,
            SearchAttempt::Rejected => panic!("Expected a pending search"),
        };
        let query = pending.query().clone();
        let outcome = pending.send().await;
        assert_eq!(outcome.thread_count(), 3);

        let records = render(&outcome, &query, chrono::Utc::now());
        assert_eq!(records.len(), 3);
        for record in records {
            match record {
                DisplayRecord::Thread(card) => {
                    assert!(!card.time_ago.is_empty());
                    assert!(card.initials.chars().count() <= 2);
                }
                other => panic!("Expected thread card, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_each_invocation_refetches() {
        let (client, mock) = spawn_backend(StatusCode::OK, THREE_THREADS).await;
        run(&client, "synth", &[]).await;
        run(&client, "synth", &[]).await;
        assert_eq!(mock.hits(), 2);
    }

    #[tokio::test]
    async fn test_last_response_wins_is_callers_choice() {
        // Two overlapping searches both complete; nothing is cancelled.
        let (client, mock) = spawn_backend(StatusCode::OK, THREE_THREADS).await;
        let first = match client.prepare_search("first", &TagSelection::new()) {
            SearchAttempt::Pending(pending) => pending,
            SearchAttempt::Rejected => panic!("Expected a pending search"),
        };
        let second = match client.prepare_search("second", &TagSelection::new()) {
            SearchAttempt::Pending(pending) => pending,
            SearchAttempt::Rejected => panic!("Expected a pending search"),
        };
        assert_ne!(first.request_id(), second.request_id());

        let (a, b) = tokio::join!(first.send(), second.send());
        assert_eq!(a.thread_count(), 3);
        assert_eq!(b.thread_count(), 3);
        assert_eq!(mock.hits(), 2);
    }

    #[tokio::test]
    async fn test_result_limit_is_clamped() {
        let (client, mock) = spawn_backend(StatusCode::OK, THREE_THREADS).await;
        let config = Config {
            api_base_url: client.base_url().to_string(),
            request_timeout_secs: Some(5),
            result_limit: Some(500),
        };
        let client = BackendClient::from_config(&config).unwrap();
        run(&client, "synth", &[]).await;
        assert_eq!(mock.last_query(), "q=synth&limit=50");
    }

    #[tokio::test]
    async fn test_list_tags() {
        let (client, _mock) = spawn_backend(
            StatusCode::OK,
            r#"{"success": true, "data": [{"name": "synthwave", "type": "genre"}, {"name": "live", "type": "format"}]}"#,
        )
        .await;
        let tags = client.list_tags().await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "synthwave");
        assert_eq!(tags[1].kind.as_deref(), Some("format"));
    }

    #[tokio::test]
    async fn test_list_tags_unsuccessful_is_empty() {
        let (client, _mock) = spawn_backend(StatusCode::OK, r#"{"success": false}"#).await;
        assert!(client.list_tags().await.unwrap().is_empty());
    }

    #[test]
    fn test_search_url_encodes_values() {
        let client = BackendClient::new("http://localhost:8085/");
        let query = match compose("lo fi", &selection(&["hip hop", "jazz"])) {
            Composition::Ready(query) => query,
            Composition::Rejected => panic!("Expected Ready"),
        };
        let url = client.search_url(&query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8085/api/public/threads/search?q=lo+fi&tags=hip+hop%2Cjazz"
        );
    }
}
