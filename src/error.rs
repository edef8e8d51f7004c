use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("customer city {customer_city} differs from restaurant city {restaurant_city}")]
    CityMismatch {
        customer_city: Uuid,
        restaurant_city: Uuid,
    },

    #[error("no available driver in city {city_id} at {delivery_time}")]
    NoAvailableDriver {
        city_id: Uuid,
        delivery_time: DateTime<Utc>,
    },

    #[error("driver {driver_id} already has a delivery at {delivery_time}")]
    ConcurrentAssignmentConflict {
        driver_id: Uuid,
        delivery_time: DateTime<Utc>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable label used for metrics and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "invalid_argument",
            AppError::CityMismatch { .. } => "city_mismatch",
            AppError::NoAvailableDriver { .. } => "no_available_driver",
            AppError::ConcurrentAssignmentConflict { .. } => "concurrent_assignment_conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal",
        }
    }
}
