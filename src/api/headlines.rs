//! Regional news headlines
//!
//! GET /api/headlines?category=<region>

use axum::{
    extract::{Query, State},
    Json,
};

use crate::schemas::api::{Headline, HeadlinesQuery};
use crate::server::state::AppState;

/// Never fails: unreachable feeds just contribute nothing.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HeadlinesQuery>,
) -> Json<Vec<Headline>> {
    let headlines = state.feeds.headlines(query.category.as_deref()).await;

    tracing::info!(
        category = query.category.as_deref().unwrap_or("-"),
        count = headlines.len(),
        "Headlines collected"
    );

    Json(headlines)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, router, settings};
    use crate::config::{Credentials, FeedRegion};
    use axum::http::StatusCode;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_headlines_by_category() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rss");
                then.status(200).body(
                    "<rss><channel><item><title>Turbine fleet passes annual inspection</title>\
                     <link>https://example.com/t</link></item></channel></rss>",
                );
            })
            .await;

        let dir = TempDir::new().unwrap();
        let mut settings = settings(
            &server.base_url(),
            Credentials::default(),
            &dir.path().join("stats.json"),
        );
        let feed = server.url("/rss");
        settings.feeds.regions = vec![
            FeedRegion::new("Europe", &[feed.as_str()]),
            FeedRegion::new("USA", &[feed.as_str()]),
        ];
        let app = router(settings);

        let (status, body) = get(app.clone(), "/api/headlines?category=europe").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "title": "Turbine fleet passes annual inspection",
                "link": "https://example.com/t",
                "source": "Europe"
            }])
        );

        let (status, body) = get(app, "/api/headlines").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}
