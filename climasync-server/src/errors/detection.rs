use axum::http::StatusCode;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DetectionError {
    #[error("Detection {0} not found")]
    NotFound(u64),

    #[error("Confidence must be within 0..=1, got {0}")]
    InvalidConfidence(f64),
}

impl DetectionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DetectionError::NotFound(_) => StatusCode::NOT_FOUND,
            DetectionError::InvalidConfidence(_) => StatusCode::BAD_REQUEST,
        }
    }
}
