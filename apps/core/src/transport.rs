use serde::{Deserialize, Serialize};

use crate::contract::{CoreRequest, CoreResponse};
use crate::core_service::{CoreService, EventSink, ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    Store,
    Model,
    Config,
    Provider,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(
    service: &CoreService,
    request: CoreRequest,
    events: &EventSink,
) -> TransportResponse {
    match service.handle_command(request, events) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err {
            error: map_service_error(error),
        },
    }
}

pub fn handle_json(service: &CoreService, payload: &str, events: &EventSink) -> String {
    let response = match serde_json::from_str::<CoreRequest>(payload) {
        Ok(request) => handle_request(service, request, events),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };
    encode(&response)
}

pub fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| {
        r#"{"status":"err","error":{"code":"invalid_json","message":"failed to encode response"}}"#
            .to_string()
    })
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    let code = match &error {
        ServiceError::InvalidRequest(_) => ErrorCode::InvalidRequest,
        ServiceError::Store(_) => ErrorCode::Store,
        ServiceError::Model(_) => ErrorCode::Model,
        ServiceError::Config(_) => ErrorCode::Config,
        ServiceError::Provider(_) => ErrorCode::Provider,
    };
    let message = match error {
        ServiceError::InvalidRequest(message) | ServiceError::Config(message) => message,
        other => other.to_string(),
    };
    ErrorResponse { code, message }
}
