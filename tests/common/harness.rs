//! Test server harness: a local stand-in for the YouTube Data API and a vidalign
//! server wired to it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use vidalign::embedding::{Ensemble, EnsembleConfig};
use vidalign::gateway::{HandlerState, create_router_with_state};
use vidalign::scoring::AlignmentScorer;
use vidalign::video::YouTubeClient;

pub const TEST_API_KEY: &str = "test-api-key";
pub const KNOWN_VIDEO_ID: &str = "dQw4w9WgXcQ";
pub const KNOWN_TITLE: &str = "Rust in 100 Seconds";
pub const KNOWN_DESCRIPTION: &str = "Rust is a memory-safe systems programming language.";
/// Listed by the fake API with an empty snippet object.
pub const BARE_VIDEO_ID: &str = "bareSnippet";
/// Makes the fake API answer with a quota error.
pub const QUOTA_VIDEO_ID: &str = "quotaExceed";
/// Makes the fake API answer 200 with a body that is not JSON.
pub const GARBLED_VIDEO_ID: &str = "garbledBody";

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve(router: Router) -> std::io::Result<TestServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    Ok(TestServer {
        addr,
        _server_handle: handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Fake `videos.list` endpoint plus a record of the query strings it saw.
pub struct FakeYouTube {
    pub server: TestServer,
    pub requests: Arc<parking_lot::Mutex<Vec<HashMap<String, String>>>>,
    hits: Arc<AtomicUsize>,
}

impl FakeYouTube {
    pub fn base_url(&self) -> String {
        self.server.url()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> YouTubeClient {
        YouTubeClient::with_base_url(TEST_API_KEY, self.base_url()).unwrap()
    }
}

#[derive(Clone)]
struct FakeState {
    requests: Arc<parking_lot::Mutex<Vec<HashMap<String, String>>>>,
    hits: Arc<AtomicUsize>,
}

async fn videos_handler(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().push(params.clone());

    if params.get("key").map(String::as_str) != Some(TEST_API_KEY) {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "error": {"code": 403, "message": "API key not valid. Please pass a valid API key."}
            })),
        )
            .into_response();
    }

    let id = params.get("id").cloned().unwrap_or_default();
    match id.as_str() {
        KNOWN_VIDEO_ID => Json(serde_json::json!({
            "kind": "youtube#videoListResponse",
            "items": [{
                "id": KNOWN_VIDEO_ID,
                "snippet": {"title": KNOWN_TITLE, "description": KNOWN_DESCRIPTION}
            }]
        }))
        .into_response(),
        BARE_VIDEO_ID => Json(serde_json::json!({
            "items": [{"id": BARE_VIDEO_ID, "snippet": {}}]
        }))
        .into_response(),
        QUOTA_VIDEO_ID => (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}
            })),
        )
            .into_response(),
        GARBLED_VIDEO_ID => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => Json(serde_json::json!({"kind": "youtube#videoListResponse", "items": []}))
            .into_response(),
    }
}

pub async fn spawn_fake_youtube() -> std::io::Result<FakeYouTube> {
    let requests = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicUsize::new(0));

    let router = Router::new()
        .route("/videos", get(videos_handler))
        .with_state(FakeState {
            requests: Arc::clone(&requests),
            hits: Arc::clone(&hits),
        });

    Ok(FakeYouTube {
        server: serve(router).await?,
        requests,
        hits,
    })
}

/// Spawns a vidalign server with the stub ensemble, fetching metadata from `youtube`.
pub async fn spawn_test_server(youtube: &FakeYouTube) -> std::io::Result<TestServer> {
    let ensemble = Ensemble::load(&EnsembleConfig::reference_stub())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let scorer = AlignmentScorer::new(Arc::new(ensemble), youtube.client());
    serve(create_router_with_state(HandlerState::new(Arc::new(scorer)))).await
}
