//! Export route — stream the last render in the requested format.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};

use crate::error::error_body;
use crate::services::export::{self, ExportError, ExportFormat};
use crate::state::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn export_status(err: &ExportError) -> StatusCode {
    match err {
        ExportError::NothingRendered => StatusCode::PRECONDITION_FAILED,
        ExportError::UnknownFormat(_) => StatusCode::BAD_REQUEST,
        ExportError::RasterizerUnavailable => StatusCode::NOT_IMPLEMENTED,
        ExportError::Raster(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/export/:format` — download the diagram as an attachment.
pub async fn export(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, ApiError> {
    let format = ExportFormat::parse(&format).map_err(|e| error_body(export_status(&e), &e))?;
    let file = export::export(&state, format)
        .await
        .map_err(|e| error_body(export_status(&e), &e))?;

    Ok((
        [
            (CONTENT_TYPE, file.content_type.to_owned()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file.filename)),
        ],
        file.bytes,
    )
        .into_response())
}
