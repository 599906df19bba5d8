use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::generator::{self, ipv4, rules, ValidationReport};
use crate::models::*;
use crate::AppState;

use super::{ApiError, MessageResponse};

const EXPORT_FILENAME: &str = "network-config.txt";

/// POST /api/configs/validate - report failing fields without rendering.
/// With `?field=name` only that field is re-checked; port rows are named
/// `ports[<i>].port_id` / `ports[<i>].mode`.
pub async fn validate(
    _auth: AuthUser,
    Query(query): Query<ValidateQuery>,
    Json(form): Json<ConfigForm>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let Some(name) = query.field.filter(|f| !f.is_empty()) else {
        return Ok(Json(rules::validate_form(&form).into()));
    };

    let mut report = ValidationReport::default();

    if let Some((index, attr)) = rules::parse_port_field(&name) {
        let result = rules::check_port_field(&form, index, attr)
            .ok_or_else(|| ApiError::bad_request(format!("no port row {}", index)))?;
        if let (true, Err(e)) = (form.is_switch(), result) {
            report.push(rules::port_field(index, attr.name()), e);
        }
        return Ok(Json(report.into()));
    }

    let field = rules::Field::from_name(&name)
        .ok_or_else(|| ApiError::bad_request(format!("unknown field: {}", name)))?;
    if rules::applies(field, &form) {
        if let Err(e) = rules::check_field(field, &form) {
            report.push(field.name(), e);
        }
    }
    Ok(Json(report.into()))
}

/// GET /api/configs/suggest-cidr?ip= - classful prefix for the form's auto-fill
pub async fn suggest_cidr(
    _auth: AuthUser,
    Query(query): Query<SuggestCidrQuery>,
) -> Json<SuggestCidrResponse> {
    let ip = query.ip.trim().to_string();
    let cidr = ipv4::suggested_cidr(&ip);
    let netmask = cidr.and_then(|c| ipv4::cidr_to_netmask(u32::from(c)).ok());
    Json(SuggestCidrResponse { ip, cidr, netmask })
}

/// POST /api/configs/generate - validate and render, nothing is stored
pub async fn generate(
    _auth: AuthUser,
    Json(form): Json<ConfigForm>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let rendered = generator::generate(&form)?;
    Ok(Json(GenerateResponse {
        config_text: rendered.config_text,
        config_hash: rendered.config_hash,
    }))
}

/// POST /api/configs - render the form and store it in the caller's history.
/// An active record with the same text is returned instead of a duplicate.
pub async fn save_config(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(form): Json<ConfigForm>,
) -> Result<Response, ApiError> {
    let rendered = generator::generate(&form)?;

    if let Some(existing) = state
        .store
        .find_active_config_by_hash(auth.user_id, &rendered.config_hash)
        .await?
    {
        tracing::debug!("Config {} already saved for user {}", existing.id, auth.user_id);
        let body = SaveConfigResponse {
            message: "Configuration already saved".to_string(),
            duplicate: true,
            config: existing,
        };
        return Ok((StatusCode::OK, Json(body)).into_response());
    }

    let record = NewConfigRecord::from_rendered(auth.user_id, &rendered);
    let saved = state.store.save_config(&record).await?;
    tracing::info!("Saved config {} ({}) for user {}", saved.id, saved.hostname, auth.user_id);

    let body = SaveConfigResponse {
        message: "Configuration saved successfully".to_string(),
        duplicate: false,
        config: saved,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// GET /api/configs/history
pub async fn history(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConfigRecord>>, ApiError> {
    let configs = state.store.list_active_configs(auth.user_id).await?;
    Ok(Json(configs))
}

/// GET /api/configs/deleted
pub async fn deleted(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConfigRecord>>, ApiError> {
    let configs = state.store.list_deleted_configs(auth.user_id).await?;
    Ok(Json(configs))
}

/// GET /api/configs/:id
pub async fn get_config(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ConfigRecord>, ApiError> {
    let config = state.store.get_user_config(id, auth.user_id).await?;
    Ok(Json(config))
}

/// GET /api/configs/:id/export - stored text as a file download
pub async fn export_config(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let config = state.store.get_user_config(id, auth.user_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILENAME);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        config.config_text,
    )
        .into_response())
}

/// DELETE /api/configs/:id - soft delete
pub async fn delete_config(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.store.soft_delete_config(id, auth.user_id).await? == 0 {
        return Err(ApiError::not_found_msg("Configuration not found or already deleted"));
    }
    tracing::info!("Deleted config {} for user {}", id, auth.user_id);
    Ok(MessageResponse::new("Configuration deleted successfully"))
}

/// PATCH /api/configs/restore/:id
pub async fn restore_config(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.store.restore_config(id, auth.user_id).await? == 0 {
        return Err(ApiError::not_found_msg("Configuration not found or already restored"));
    }
    tracing::info!("Restored config {} for user {}", id, auth.user_id);
    Ok(MessageResponse::new("Configuration restored successfully"))
}
