//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `postgres` or `memory`; tells an operator whether the database
    /// fallback warning at startup actually applied.
    pub store: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store_backend,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::state::AppState;

    #[actix_web::test]
    async fn health_reports_the_live_store_backend() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            #[cfg(feature = "postgres")]
            database: None,
            feed_page_size: 50,
            notification_limit: 20,
        };
        let state = AppState::new(&config).await;

        let resp = health_check(web::Data::new(state)).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], "memory");
    }
}
