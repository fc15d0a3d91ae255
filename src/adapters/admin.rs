use {
    super::{api_errors::ApiError, receipt::render_receipt_pdf},
    crate::{
        AppState,
        domain::error::PaymentError,
        infra::sqlite::transaction_store::TransactionFilter,
        services::reconciliation::receipt_details,
    },
    axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::{HeaderMap, header},
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    serde::Deserialize,
    serde_json::json,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/transactions", get(list_transactions))
        .route("/admin/transactions/{key}", get(transaction_detail))
        .route(
            "/admin/transactions/{key}/resend-receipt",
            post(resend_receipt),
        )
        .route("/admin/transactions/{key}/receipt", get(download_receipt))
}

/// Token auth via the `x-admin-token` header. With no token configured the
/// admin surface is open — matches local/dev deployments where the token
/// is simply not set.
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), PaymentError> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Ok(());
    };
    let provided = headers.get("x-admin-token").and_then(|v| v.to_str().ok());
    if provided != Some(expected) {
        return Err(PaymentError::Auth("invalid admin token".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub email: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn list_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &headers)?;

    let filter = TransactionFilter {
        status: query.status,
        email: query.email,
        q: query.q,
        limit: query.limit,
        offset: query.offset,
    };
    let rows = state.service.store().list(&filter).await?;
    Ok(Json(json!({"ok": true, "rows": rows})))
}

async fn transaction_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &headers)?;

    let row = state
        .service
        .store()
        .find_by_key(&key)
        .await?
        .ok_or_else(|| PaymentError::NotFound(key))?;
    Ok(Json(json!({"ok": true, "row": row})))
}

async fn resend_receipt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &headers)?;

    state.service.resend_receipt(&key).await?;
    Ok(Json(json!({"ok": true})))
}

async fn download_receipt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers)?;

    let row = state
        .service
        .store()
        .find_by_key(&key)
        .await?
        .ok_or_else(|| PaymentError::NotFound(key))?;
    let pdf = render_receipt_pdf(&receipt_details(&row))?;

    let response = (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=receipt_{}.pdf", row.reference),
            ),
        ],
        pdf,
    )
        .into_response();
    Ok(response)
}
