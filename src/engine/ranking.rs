use std::sync::Arc;

use tracing::debug;

use crate::engine::selection::rank_by_distance;
use crate::error::AppError;
use crate::models::city::City;
use crate::models::delivery::DriverDistance;
use crate::store::DeliveryStore;

/// Driver workload reports ordered by descending total distance.
pub struct RankingReporter {
    store: Arc<dyn DeliveryStore>,
}

impl RankingReporter {
    pub fn new(store: Arc<dyn DeliveryStore>) -> Self {
        Self { store }
    }

    pub fn rank_drivers(&self) -> Result<Vec<DriverDistance>, AppError> {
        let mut rows = self.store.find_all_driver_totals()?;
        rank_by_distance(&mut rows);

        debug!(drivers = rows.len(), "driver rank report built");
        Ok(rows)
    }

    pub fn rank_drivers_by_city(&self, city: &City) -> Result<Vec<DriverDistance>, AppError> {
        let mut rows = self.store.find_driver_totals_by_city(city.id)?;
        rows.retain(|row| row.driver.city_id == city.id);
        rank_by_distance(&mut rows);

        debug!(city = %city.name, drivers = rows.len(), "city driver rank report built");
        Ok(rows)
    }
}
