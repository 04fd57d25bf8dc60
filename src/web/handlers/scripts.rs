use axum::extract::State;
use axum::Json;

use crate::models::UnscheduledEntry;
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// Unscheduled scripts: GET /api/dags/unscheduled-scripts
pub async fn unscheduled_scripts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UnscheduledEntry>>> {
    let entries = state.scripts.unscheduled_scripts().await?;
    Ok(Json(entries))
}
