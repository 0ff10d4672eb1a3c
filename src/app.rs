use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{chat, nutrition, profile, uploads};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(chat::router())
                .merge(uploads::router())
                .merge(nutrition::router())
                .merge(profile::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::token_for;
    use crate::state::testing::fake_state;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    const BOUNDARY: &str = "XMEALBOUNDARY";

    fn authed(method: &str, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(Uuid::new_v4())))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        authed(method, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file {
                Some((file_name, content_type)) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        authed("POST", "/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(req: Request<Body>) -> Response {
        build_app(fake_state()).oneshot(req).await.unwrap()
    }

    async fn error_of(res: Response) -> String {
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&body).unwrap();
        v["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = send(Request::get("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        for uri in ["/api/nutrition", "/api/chat", "/api/user/profile", "/api/nutrition/intake"] {
            let res = send(Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(error_of(res).await, "Unauthenticated");
        }
    }

    #[tokio::test]
    async fn bad_token_is_unauthorized() {
        let req = Request::get("/api/nutrition")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let res = send(req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(res).await, "Invalid or expired token");
    }

    #[tokio::test]
    async fn adjust_without_date_is_bad_request() {
        let res = send(json_request(
            "PUT",
            "/api/nutrition/adjust",
            r#"{"calories":1800,"protein":70,"fat":60,"carbs":220}"#,
        ))
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(res).await, "Date is required");
    }

    #[tokio::test]
    async fn adjust_with_malformed_json_is_bad_request() {
        let res = send(json_request("PUT", "/api/nutrition/adjust", "{not json")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_intake_period_is_bad_request() {
        let req = authed("GET", "/api/nutrition/intake?period=decade")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn profile_with_string_activity_factor_is_bad_request() {
        let res = send(json_request(
            "PUT",
            "/api/user/profile",
            r#"{"gender":"male","age":30,"height":175,"weight":70,"activity_factor":"high"}"#,
        ))
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(res).await, "Invalid activity factor");
    }

    #[tokio::test]
    async fn empty_chat_message_is_bad_request() {
        let res = send(json_request("POST", "/api/chat", r#"{"message":"   "}"#)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(res).await, "Message is required");
    }

    #[tokio::test]
    async fn upload_without_image_is_bad_request() {
        let res = send(multipart_request(&[("threadId", None, "t1")])).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(res).await, "No file uploaded");
    }

    #[tokio::test]
    async fn upload_without_thread_is_bad_request() {
        let res = send(multipart_request(&[(
            "image",
            Some(("lunch.jpg", "image/jpeg")),
            "jpegbytes",
        )]))
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(res).await, "Thread ID is required");
    }

    #[tokio::test]
    async fn upload_of_non_image_is_bad_request() {
        let res = send(multipart_request(&[
            ("image", Some(("notes.txt", "text/plain")), "hello"),
            ("threadId", None, "t1"),
        ]))
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(res).await, "Uploaded file must be an image");
    }
}
