//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, StateResponse, TelemetryQuery, TelemetryRecord};

/// Returns scenario, episode summary, and latest step record.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        config: state.config.clone(),
        summary: state.summary.clone(),
        latest_step: state.records.last().map(TelemetryRecord::from),
    })
}

/// Returns step records, optionally filtered by step range.
///
/// `GET /telemetry` → 200 + `Vec<TelemetryRecord>` JSON
/// `GET /telemetry?from=N&to=M` → filtered range (inclusive)
/// `GET /telemetry?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_telemetry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TelemetryQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<TelemetryRecord> = state
        .records
        .iter()
        .filter(|r| (from..=to).contains(&r.step))
        .map(TelemetryRecord::from)
        .collect();

    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::ScenarioConfig;
    use crate::sim::balance::Settlement;
    use crate::sim::kpi::EpisodeSummary;
    use crate::sim::types::StepRecord;

    fn make_test_state(steps: usize) -> Arc<AppState> {
        let records: Vec<StepRecord> = (0..steps)
            .map(|t| StepRecord {
                step: t,
                settlement_period: (t % 48) as u8 + 1,
                action: vec![5.0, 0.0, 0.0],
                clipped: false,
                hgh_demand: 10.0,
                lgh_demand: 0.0,
                cooling_demand: 0.0,
                electrical_demand: 20.0,
                gas_price: 20.0,
                import_price: 100.0,
                export_price: 50.0,
                settlement: Settlement {
                    import: 15.0,
                    reward: -800.0,
                    ..Settlement::default()
                },
            })
            .collect();
        Arc::new(AppState {
            config: ScenarioConfig::baseline(),
            summary: EpisodeSummary::from_records(&records),
            records,
        })
    }

    async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn state_returns_200() {
        let (status, json) = get_json(make_test_state(24), "/state").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("config").is_some());
        assert_eq!(json["summary"]["steps"], 24);
        assert_eq!(json["latest_step"]["step"], 23);
        assert_eq!(json["config"]["assets"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn state_with_no_steps_has_null_latest() {
        let (status, json) = get_json(make_test_state(0), "/state").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["latest_step"].is_null());
    }

    #[tokio::test]
    async fn telemetry_returns_all_steps() {
        let (status, json) = get_json(make_test_state(24), "/telemetry").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn telemetry_range_query() {
        let (status, json) = get_json(make_test_state(24), "/telemetry?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6); // steps 5..=10
        assert_eq!(rows[0]["step"], 5);
        assert_eq!(rows[5]["step"], 10);
        assert_eq!(rows[0]["action_mw"][0], 5.0);
    }

    #[tokio::test]
    async fn telemetry_invalid_range_returns_400() {
        let (status, json) = get_json(make_test_state(24), "/telemetry?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }
}
