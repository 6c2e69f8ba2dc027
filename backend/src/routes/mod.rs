//! Route definitions for the stock ledger

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/stock", stock_routes())
        .nest("/intakes", intake_routes())
}

/// Raw material intake routes
fn intake_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_intake_list))
        .route("/:intake_id", get(handlers::get_intake_overview))
}

/// Stock report routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::get_stock_summary))
        .route(
            "/suppliers/:supplier_id/summary",
            get(handlers::get_supplier_summary),
        )
        .route(
            "/suppliers/:supplier_id/items/:item_id",
            get(handlers::get_supplier_item_detail),
        )
        .route("/items/:item_id", get(handlers::get_item_detail))
        .route("/period", get(handlers::get_period_report))
        .route("/period/export", get(handlers::export_period_report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{failing_state, sample_state};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new().nest("/api/v1", api_routes()).with_state(state)
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_summary_route() {
        let (status, body) =
            get_json(sample_state(), "/api/v1/stock/summary?asOnDate=2024-01-05").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["reference_date"], "05/01/2024");
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"][1]["product_name"], "Vannamei");
        assert_eq!(body["data"][1]["total_quantity"], "28");
    }

    #[tokio::test]
    async fn test_unparsable_date_is_not_an_error() {
        let (status, body) =
            get_json(sample_state(), "/api/v1/stock/summary?asOnDate=yesterday-ish").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_item_detail_route_with_filters() {
        let (_, body) = get_json(
            sample_state(),
            "/api/v1/stock/items/2?asOnDate=05/01/2024&calculationMode=2&packingId=1",
        )
        .await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["section"], "Block (Grade Weight)");
        assert_eq!(data[0]["rows"][3]["row_type"], "NO OF CASES");

        let (_, body) = get_json(
            sample_state(),
            "/api/v1/stock/items/2?asOnDate=2024-01-05&calculationMode=1",
        )
        .await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["section"], "IQF");
    }

    #[tokio::test]
    async fn test_supplier_routes() {
        let (_, body) = get_json(
            sample_state(),
            "/api/v1/stock/suppliers/7/items/1?asOnDate=2024-01-05",
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = get_json(
            sample_state(),
            "/api/v1/stock/suppliers/7/summary?asOnDate=2024-01-05",
        )
        .await;
        assert_eq!(body["data"][0]["product_name"], "Vannamei");
    }

    #[tokio::test]
    async fn test_period_route() {
        let (_, body) = get_json(
            sample_state(),
            "/api/v1/stock/period?fromDate=2024-01-04&toDate=2024-01-05",
        )
        .await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 6);
        assert_eq!(data[0]["rows"][0]["row_type"], "Opening");
    }

    #[tokio::test]
    async fn test_store_failure_is_enveloped() {
        let (status, body) = get_json(failing_state(), "/api/v1/stock/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
        assert!(body["error"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_export_route() {
        let response = app(sample_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/stock/period/export?toDate=2024-01-05")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("StockViewReport_20240105.csv"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert!(csv.starts_with("Overall,STOCK AS ON 05/01/2024"));
    }

    #[tokio::test]
    async fn test_export_failure_uses_error_body() {
        let (status, body) = get_json(failing_state(), "/api/v1/stock/period/export").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_intake_list_route() {
        let (status, body) = get_json(
            sample_state(),
            "/api/v1/intakes?fromDate=2024-01-01&toDate=2024-01-04",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["supplier_name"], "Sea Harvest");
        assert_eq!(data[0]["client_weight"], "40");
    }

    #[tokio::test]
    async fn test_intake_overview_route() {
        let (_, body) = get_json(sample_state(), "/api/v1/intakes/2").await;
        assert_eq!(body["success"], true);
        let production = body["data"][0]["production"].as_array().unwrap();
        assert_eq!(production.len(), 2);
        assert_eq!(production[1]["balance"], "11");

        let (status, body) = get_json(sample_state(), "/api/v1/intakes/99").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Intake 99 not found");
    }

    #[tokio::test]
    async fn test_health_route() {
        let (_, body) = get_json(sample_state(), "/api/v1/health").await;
        assert_eq!(body["store"], "connected");

        let (_, body) = get_json(failing_state(), "/api/v1/health").await;
        assert_eq!(body["store"], "disconnected");
    }
}
