use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, FieldErrors},
    models::{AlertView, CreateAlertPayload},
    services::alerts_service,
    AppState,
};

#[utoipa::path(
    post,
    path = "/alerts",
    tag = "alerts",
    request_body = CreateAlertPayload,
    responses(
        (status = 201, description = "The alert has been created", body = AlertView),
        (status = 400, description = "Invalid input"),
    )
)]
pub async fn post_create_alert(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlertPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<AlertView>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        let mut errs = FieldErrors::new();
        errs.insert("_form".into(), rejection.body_text());
        AppError::Validation(errs)
    })?;

    let new_alert = alerts_service::validate_alert(&payload).map_err(AppError::Validation)?;
    let alert = alerts_service::create_alert(&state, new_alert).await?;

    Ok((StatusCode::CREATED, Json(AlertView::from(alert))))
}
