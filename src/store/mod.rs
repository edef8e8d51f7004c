pub mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::delivery::{Delivery, DriverDistance, NewDelivery};
use crate::models::driver::Driver;

pub use memory::MemoryStore;

/// Driver and delivery access used by the assignment engine and the ranking reports.
///
/// `save_delivery` must reject a second delivery for the same driver at the same instant with
/// [`AppError::ConcurrentAssignmentConflict`], atomically with the write. The engine relies on
/// that check when assignments for one city run in parallel.
pub trait DeliveryStore: Send + Sync {
    fn find_drivers_by_city(&self, city_id: Uuid) -> Result<Vec<Driver>, AppError>;

    fn find_deliveries_by_driver(&self, driver_id: Uuid) -> Result<Vec<Delivery>, AppError>;

    /// Whether the driver already holds a delivery at exactly `delivery_time`.
    fn is_driver_booked(
        &self,
        driver_id: Uuid,
        delivery_time: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        Ok(self
            .find_deliveries_by_driver(driver_id)?
            .iter()
            .any(|delivery| delivery.delivery_time == delivery_time))
    }

    /// Per-driver distance totals. Drivers without deliveries are omitted; order is unspecified.
    fn find_all_driver_totals(&self) -> Result<Vec<DriverDistance>, AppError>;

    fn find_driver_totals_by_city(&self, city_id: Uuid) -> Result<Vec<DriverDistance>, AppError>;

    fn save_delivery(&self, delivery: NewDelivery) -> Result<Delivery, AppError>;
}
