//! HTTP surface: the achievements endpoint, CORS, and static files.

use std::path::Path;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use common::{Achievement, Error};
use leaderboard::AchievementService;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::error;

pub const ACHIEVEMENTS_PATH: &str = "/api/achievements";

/// Upstream or merge failure, answered with 502 and the cause in plain text.
#[derive(Debug)]
pub struct UpstreamFailure(Error);

impl From<Error> for UpstreamFailure {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for UpstreamFailure {
    fn into_response(self) -> Response {
        error!("Failed to fetch achievements: {}", self.0);
        (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Failed to fetch achievements: {}\n", self.0),
        )
            .into_response()
    }
}

/// Pretty JSON (2-space indent) with a trailing newline.
pub fn render_json(achievements: &[Achievement]) -> Result<Vec<u8>, Error> {
    let mut body = serde_json::to_vec_pretty(achievements)?;
    body.push(b'\n');
    Ok(body)
}

async fn achievements_handler(
    State(service): State<AchievementService>,
) -> Result<Response, UpstreamFailure> {
    let achievements = service.achievements().await?;
    let body = render_json(&achievements)?;
    Ok((
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}

/// Allow any origin for GET; answer every preflight with 204.
async fn cors(req: Request, next: Next) -> Response {
    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    resp
}

/// Build the service router. Paths other than the API fall through to
/// files under `static_dir`.
pub fn router(service: AchievementService, static_dir: &Path) -> Router {
    Router::new()
        .route(ACHIEVEMENTS_PATH, get(achievements_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use common::{PercentageMap, Result};
    use leaderboard::{new_shared_cache, AchievementSource};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt; // for `oneshot`

    const TTL: Duration = Duration::from_secs(6 * 60 * 60);

    struct StaticSource {
        with_key: bool,
        schema_calls: AtomicUsize,
    }

    #[async_trait]
    impl AchievementSource for StaticSource {
        async fn fetch_schema(&self) -> Result<Vec<Achievement>> {
            self.schema_calls.fetch_add(1, Ordering::SeqCst);
            if !self.with_key {
                return Err(Error::MissingCredential(
                    "STEAM_API_KEY is not set (required for GetSchemaForGame)".into(),
                ));
            }
            Ok(vec![
                Achievement {
                    api_name: "A".into(),
                    name: "Zeta".into(),
                    description: "first".into(),
                    icon: "a.jpg".into(),
                    icon_gray: "a_gray.jpg".into(),
                    hidden: false,
                    global_pct: 0.0,
                },
                Achievement {
                    api_name: "B".into(),
                    name: "Alpha".into(),
                    description: String::new(),
                    icon: String::new(),
                    icon_gray: String::new(),
                    hidden: true,
                    global_pct: 0.0,
                },
            ])
        }

        async fn fetch_percentages(&self) -> Result<PercentageMap> {
            Ok([("A".to_string(), 10.5)].into_iter().collect())
        }
    }

    fn app(with_key: bool, static_dir: &Path) -> (Router, Arc<StaticSource>) {
        let source = Arc::new(StaticSource {
            with_key,
            schema_calls: AtomicUsize::new(0),
        });
        let service = AchievementService::new(source.clone(), new_shared_cache(), TTL);
        (router(service, static_dir), source)
    }

    fn get_request(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn body_string(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "achievement-board-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[tokio::test]
    async fn test_achievements_json_shape() {
        let (app, _) = app(true, Path::new("./static"));
        let resp = app.oneshot(get_request(ACHIEVEMENTS_PATH)).await.expect("response");

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let body = body_string(resp).await;
        let expected = r#"[
  {
    "apiName": "A",
    "name": "Zeta",
    "description": "first",
    "icon": "a.jpg",
    "iconGray": "a_gray.jpg",
    "hidden": false,
    "globalPct": 10.5
  },
  {
    "apiName": "B",
    "name": "Alpha",
    "description": "",
    "icon": "",
    "iconGray": "",
    "hidden": true,
    "globalPct": 0.0
  }
]
"#;
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let (app, source) = app(true, Path::new("./static"));
        for _ in 0..3 {
            let resp = app
                .clone()
                .oneshot(get_request(ACHIEVEMENTS_PATH))
                .await
                .expect("response");
            assert_eq!(resp.status(), StatusCode::OK);
        }
        assert_eq!(source.schema_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_502_with_cause() {
        let (app, _) = app(false, Path::new("./static"));
        let resp = app.oneshot(get_request(ACHIEVEMENTS_PATH)).await.expect("response");

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = body_string(resp).await;
        assert!(body.starts_with("Failed to fetch achievements: "));
        assert!(body.contains("STEAM_API_KEY"));
    }

    #[tokio::test]
    async fn test_preflight_is_204_without_body() {
        let (app, source) = app(true, Path::new("./static"));
        let req = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri(ACHIEVEMENTS_PATH)
            .header(header::ORIGIN, "http://example.test")
            .body(Body::empty())
            .expect("request");
        let resp = app.oneshot(req).await.expect("response");

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, OPTIONS"
        );
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type"
        );
        assert!(body_string(resp).await.is_empty());
        assert_eq!(source.schema_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_other_paths_serve_static_files() {
        let dir = scratch_dir("static");
        std::fs::write(dir.join("index.html"), "<h1>board</h1>").expect("write index");

        let (app, _) = app(true, &dir);
        let resp = app
            .clone()
            .oneshot(get_request("/index.html"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body_string(resp).await, "<h1>board</h1>");

        let resp = app.oneshot(get_request("/missing.css")).await.expect("response");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_render_json_empty_list() {
        let body = render_json(&[]).expect("render");
        assert_eq!(body, b"[]\n");
    }
}
