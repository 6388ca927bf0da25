use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sweeper::CastGateway;

pub async fn root() -> &'static str {
    "cast-sweep: publish, search, and clean up your Farcaster casts"
}

pub async fn health() -> &'static str {
    "OK"
}

/// Body of `POST /cast`. The browser sends one flat object for both
/// the publish and the search flow; `action` picks the flow.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastRequest {
    pub signer_uuid: Option<String>,
    pub text: Option<String>,
    pub action: Option<String>,
    pub fid: Option<u64>,
    pub pattern: Option<String>,
    pub delete_before: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCastsRequest {
    pub signer_uuid: Option<String>,
    pub cast_hashes: Option<Vec<String>>,
}

pub async fn cast_post(
    State(state): State<SharedState>,
    Json(req): Json<CastRequest>,
) -> Result<Response, AppError> {
    if req.action.as_deref() == Some("search") {
        let missing = || {
            AppError::BadRequest(
                "Missing fid, pattern, or deleteBefore in request body".to_string(),
            )
        };
        let fid = req.fid.ok_or_else(missing)?;
        let pattern = req.pattern.ok_or_else(missing)?;
        let delete_before_raw = req.delete_before.ok_or_else(missing)?;

        let delete_before = sweeper::parse_timestamp(&delete_before_raw).map_err(|_| {
            AppError::BadRequest(format!("Unparseable deleteBefore date: {}", delete_before_raw))
        })?;

        tracing::info!("Searching casts of fid {} (deleteBefore={})", fid, delete_before);

        let result = sweeper::search_casts(
            &state.gateway,
            fid,
            &pattern,
            delete_before,
            state.config.page_size,
            state.config.max_pages,
        )
        .await
        .map_err(AppError::from_sweeper)?;

        return Ok(Json(result).into_response());
    }

    match (req.signer_uuid, req.text) {
        (Some(signer_uuid), Some(text)) => {
            let hash = state
                .gateway
                .publish_cast(&signer_uuid, &text)
                .await
                .map_err(AppError::from_sweeper)?;

            tracing::info!("Published cast {}", hash);
            Ok(Json(json!({
                "message": format!("Cast with hash {} published successfully", hash),
            }))
            .into_response())
        }
        _ => Err(AppError::BadRequest("Invalid request body".to_string())),
    }
}

/// `DELETE /cast`: delete the given casts one by one. The batch stops
/// at the first upstream failure and only that error is reported, so
/// a failed response may still have deleted a prefix of the list.
pub async fn cast_delete(
    State(state): State<SharedState>,
    Json(req): Json<DeleteCastsRequest>,
) -> Result<Response, AppError> {
    let (signer_uuid, cast_hashes) = match (req.signer_uuid, req.cast_hashes) {
        (Some(s), Some(h)) => (s, h),
        _ => return Err(AppError::BadRequest("Invalid request body".to_string())),
    };

    sweeper::delete_casts(&state.gateway, &signer_uuid, &cast_hashes)
        .await
        .map_err(AppError::from_sweeper)?;

    tracing::info!("Deleted {} casts", cast_hashes.len());
    Ok(Json(json!({ "message": "Casts deleted successfully" })).into_response())
}
