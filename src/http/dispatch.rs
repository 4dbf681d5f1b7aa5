//! Redirect dispatcher.
//!
//! The router's fallback: any path no handler route claimed is looked up
//! in the mapping store.

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::mapping::MappingStore;
use crate::observability::metrics;

/// Look up the request path and redirect to its destination.
pub async fn dispatch(State(store): State<MappingStore>, uri: Uri) -> Response {
    let path = uri.path();

    match store.lookup(path) {
        Some(destination) => {
            tracing::debug!(path = %path, destination = %destination, "Redirecting");
            metrics::record_redirect("hit");
            permanent_redirect(&destination)
        }
        None => {
            tracing::debug!(path = %path, "No mapping");
            metrics::record_redirect("miss");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// A `301 Moved Permanently` response to `location` with an empty body.
pub fn permanent_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location = %location, error = %e, "Destination is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingRecord;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use tower::ServiceExt;

    fn router(store: MappingStore) -> Router {
        Router::new().fallback(dispatch).with_state(store)
    }

    async fn get(router: Router, path: &str) -> Response {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        router.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_hit() {
        let store = MappingStore::new();
        store.upsert(&MappingRecord::new("/b/1f", "/2014/05/28/test.html"));

        let response = get(router(store), "/b/1f").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/2014/05/28/test.html");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_miss() {
        let response = get(router(MappingStore::new()), "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_query_is_not_part_of_key() {
        let store = MappingStore::new();
        store.upsert(&MappingRecord::new("/s", "/p"));

        let response = get(router(store), "/s?utm=x").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/p");
    }

    #[test]
    fn test_invalid_location() {
        let response = permanent_redirect("/bad\nheader");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
