use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::coord::Coordinate;
use crate::report::AtlasReport;
use crate::resolve::{builtin_object_list, ObjectInfo, ResolveError, TargetResolver};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn resolve_status(err: &ResolveError) -> StatusCode {
    match err {
        ResolveError::NotFound(_) => StatusCode::NOT_FOUND,
        ResolveError::NoInput => StatusCode::BAD_REQUEST,
        ResolveError::Network(_) | ResolveError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

// ─── GET /api/chart ──────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ChartQuery {
    pub name: Option<String>,
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub lat: Option<f64>,
}

pub async fn chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartQuery>,
) -> Result<Json<AtlasReport>, ApiError> {
    let start = Instant::now();
    let latitude = params.lat.unwrap_or(state.circumpolar_latitude);

    let target = if let Some(name) = params.name.clone() {
        // Sesame lookups block on network I/O.
        let shared = Arc::clone(&state);
        tokio::task::spawn_blocking(move || shared.resolver.resolve(&name))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| api_error(resolve_status(&e), e.to_string()))?
    } else if let (Some(ra), Some(dec)) = (params.ra.as_deref(), params.dec.as_deref()) {
        let coord = Coordinate::parse(ra, dec)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
        TargetResolver::from_manual(coord)
    } else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Provide 'name' or 'ra'+'dec' parameters",
        ));
    };

    let report = AtlasReport::build(&target, latitude).map_err(|e| {
        warn!(error = %e, "rejected chart request");
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    info!(
        object = %target.name,
        chart = %report.uranometria,
        quadrant = %report.quadrant,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/chart"
    );

    Ok(Json(report))
}

// ─── GET /api/objects ────────────────────────────────────────────

pub async fn object_list() -> Json<Vec<ObjectInfo>> {
    Json(builtin_object_list())
}

// ─── GET /api/health ─────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::DEFAULT_CIRCUMPOLAR_LATITUDE;
    use crate::resolve::cache::TargetCache;
    use tempfile::TempDir;

    fn test_state() -> (Arc<AppState>, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut resolver = TargetResolver::with_cache(TargetCache::load_from(dir.path().join("cache.json")));
        resolver.set_offline(true);
        let state = Arc::new(AppState {
            resolver,
            circumpolar_latitude: DEFAULT_CIRCUMPOLAR_LATITUDE,
        });
        (state, dir)
    }

    #[tokio::test]
    async fn test_chart_by_coordinates() {
        let (state, _dir) = test_state();
        let params = ChartQuery {
            ra: Some("00:42:44".into()),
            dec: Some("+41:16:08".into()),
            ..Default::default()
        };
        let Json(report) = chart(State(state), Query(params)).await.unwrap();
        assert_eq!(report.uranometria.volume, 1);
        assert_eq!(report.uranometria.page, 30);
        assert_eq!(report.quadrant.to_string(), "NQ1");
    }

    #[tokio::test]
    async fn test_chart_by_name_offline() {
        let (state, _dir) = test_state();
        let params = ChartQuery {
            name: Some("Vega".into()),
            lat: Some(60.0),
            ..Default::default()
        };
        let Json(report) = chart(State(state), Query(params)).await.unwrap();
        assert_eq!(report.name.as_deref(), Some("Vega"));
        assert_eq!(report.uranometria.page, 49);
        // 38.78 > 90 - 60
        assert_eq!(report.quadrant.to_string(), "NP");
    }

    #[tokio::test]
    async fn test_chart_unknown_name() {
        let (state, _dir) = test_state();
        let params = ChartQuery {
            name: Some("xyznonexistent123".into()),
            ..Default::default()
        };
        let err = chart(State(state), Query(params)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chart_bad_input() {
        let (state, _dir) = test_state();
        let err = chart(State(Arc::clone(&state)), Query(ChartQuery::default()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let params = ChartQuery {
            ra: Some("24:00:00".into()),
            dec: Some("0".into()),
            ..Default::default()
        };
        let err = chart(State(state), Query(params)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_object_list() {
        let Json(objects) = object_list().await;
        assert_eq!(objects.len(), builtin_object_list().len());
        let m31 = objects.iter().find(|o| o.name == "M31").unwrap();
        assert_eq!(m31.kind, "galaxy");
        assert!(objects.iter().all(|o| (0.0..24.0).contains(&o.ra_hours)));
    }

    #[test]
    fn test_resolve_status() {
        assert_eq!(resolve_status(&ResolveError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(resolve_status(&ResolveError::Network("down".into())), StatusCode::BAD_GATEWAY);
    }
}
