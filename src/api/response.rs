use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    let meta = ResponseMeta {
        status: "success".to_string(),
        status_code: StatusCode::OK.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message: None,
        detail: None,
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta,
        }),
    )
}

pub fn error<T: Serialize>(
    status: StatusCode,
    message: &str,
    detail: Option<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    let meta = ResponseMeta {
        status: "error".to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message: Some(message.to_string()),
        detail,
    };

    (
        status,
        Json(ApiResponse {
            data: None,
            meta,
        }),
    )
}
