use crate::models::DataEnvelope;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

pub async fn get_all_data(State(state): State<AppState>) -> Result<Json<DataEnvelope>, AppError> {
    let records = state.source.fetch_all().await?;
    tracing::debug!(
        source = state.source.mode().as_str(),
        count = records.len(),
        "Serving records"
    );
    Ok(Json(DataEnvelope::new(records)))
}
