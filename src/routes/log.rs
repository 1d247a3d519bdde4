//! Activity log route handlers

use super::{fetch_page, ok, Reply};
use crate::extract::{AppQuery, RequestId};
use crate::models::{ListData, LogEntry};
use crate::query::ListQuery;
use crate::state::SharedState;
use axum::extract::State;

/// GET /api/admin/logs
///
/// `user_id` matches the acting admin as well as the member in `details`.
pub async fn list_logs(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<LogEntry>> {
    let data = fetch_page(state.logs.as_ref(), &query, &state.config.paging).await?;
    ok(data, request_id)
}
