/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use shared::redis::error::RedisError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    error_message: String,
    pub error_code: String,
}

#[derive(Debug)]
pub enum AppError {
    InternalError(String),
    InvalidRequest(String),
    UnprocessibleRequest(String),
    InvalidGPSData(String),
    OrderTrackingNotFound(String),
    OrderTrackingAlreadyExists(String),
    DriverLocationNotFound(String),
    SerializationError(String),
    DeserializationError(String),
    KafkaPushFailed(String),
    RequestTimeout,
}

impl AppError {
    fn error_message(&self) -> ErrorBody {
        ErrorBody {
            error_message: self.message(),
            error_code: self.code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::InternalError(err) => err.to_string(),
            AppError::InvalidRequest(err) => err.to_string(),
            AppError::UnprocessibleRequest(err) => err.to_string(),
            AppError::InvalidGPSData(reason) => {
                format!("Invalid GPS data : {reason}")
            }
            AppError::OrderTrackingNotFound(order_id) => {
                format!("Order tracking not found : OrderId - {order_id}")
            }
            AppError::OrderTrackingAlreadyExists(order_id) => {
                format!("Order tracking already exists : OrderId - {order_id}")
            }
            AppError::DriverLocationNotFound(driver_id) => {
                format!("Driver location not found : DriverId - {driver_id}")
            }
            AppError::SerializationError(err) => err.to_string(),
            AppError::DeserializationError(err) => err.to_string(),
            AppError::KafkaPushFailed(reason) => {
                format!("Kafka Push Failed : {reason}")
            }
            AppError::RequestTimeout => "Request Timed Out".to_string(),
        }
    }

    fn code(&self) -> String {
        match self {
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::UnprocessibleRequest(_) => "UNPROCESSIBLE_REQUEST",
            AppError::InvalidGPSData(_) => "INVALID_GPS_DATA",
            AppError::OrderTrackingNotFound(_) => "ORDER_TRACKING_NOT_FOUND",
            AppError::OrderTrackingAlreadyExists(_) => "ORDER_TRACKING_ALREADY_EXISTS",
            AppError::DriverLocationNotFound(_) => "DRIVER_LOCATION_NOT_FOUND",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
            AppError::DeserializationError(_) => "DESERIALIZATION_ERROR",
            AppError::KafkaPushFailed(_) => "KAFKA_PUSH_FAILED",
            AppError::RequestTimeout => "REQUEST_TIMEOUT",
        }
        .to_string()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(self.error_message())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessibleRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidGPSData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::OrderTrackingNotFound(_) => StatusCode::NOT_FOUND,
            AppError::OrderTrackingAlreadyExists(_) => StatusCode::BAD_REQUEST,
            AppError::DriverLocationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DeserializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::KafkaPushFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl From<RedisError> for AppError {
    fn from(error: RedisError) -> Self {
        AppError::InternalError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::OrderTrackingNotFound("O1".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "ORDER_TRACKING_NOT_FOUND");
    }

    #[test]
    fn validation_errors_reject_before_persistence() {
        assert_eq!(
            AppError::InvalidRequest("driverId must not be empty".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidGPSData("(Lat : NaN, Lon : 0)".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
