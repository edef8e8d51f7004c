use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::driver::Driver;

/// A delivery that has been selected but not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDelivery {
    pub driver_id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_id: Uuid,
    pub delivery_time: DateTime<Utc>,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_id: Uuid,
    pub delivery_time: DateTime<Utc>,
    pub distance_km: f64,
    pub created_at: DateTime<Utc>,
}

/// Report row: a driver and the summed distance of all its deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverDistance {
    pub driver: Driver,
    pub total_distance_km: f64,
}
