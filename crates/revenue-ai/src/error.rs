use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::pricing::{CarryForwardStoreError, PricingError};
use crate::workflows::rentroll::RentRollImportError;
use crate::workflows::simulation::SimulationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Pricing(PricingError),
    Simulation(SimulationError),
    Import(RentRollImportError),
    Store(CarryForwardStoreError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Pricing(err) => write!(f, "pricing error: {}", err),
            AppError::Simulation(err) => write!(f, "simulation error: {}", err),
            AppError::Import(err) => write!(f, "rent-roll import error: {}", err),
            AppError::Store(err) => write!(f, "carry-forward store error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Pricing(err) => Some(err),
            AppError::Simulation(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Store(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Pricing(_) | AppError::Import(_) | AppError::Simulation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<PricingError> for AppError {
    fn from(value: PricingError) -> Self {
        Self::Pricing(value)
    }
}

impl From<SimulationError> for AppError {
    fn from(value: SimulationError) -> Self {
        Self::Simulation(value)
    }
}

impl From<RentRollImportError> for AppError {
    fn from(value: RentRollImportError) -> Self {
        Self::Import(value)
    }
}

impl From<CarryForwardStoreError> for AppError {
    fn from(value: CarryForwardStoreError) -> Self {
        Self::Store(value)
    }
}
