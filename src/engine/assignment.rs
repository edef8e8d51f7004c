use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::distance::DistanceSource;
use crate::engine::selection::{
    normalize_delivery_time, pick_least_busy, total_distance_km, Candidate,
};
use crate::error::AppError;
use crate::models::customer::Customer;
use crate::models::delivery::{Delivery, NewDelivery};
use crate::models::restaurant::Restaurant;
use crate::observability::metrics::Metrics;
use crate::store::DeliveryStore;

/// Assigns the least-busy available driver of the restaurant's city to an order.
pub struct AssignmentEngine {
    store: Arc<dyn DeliveryStore>,
    distance: Arc<dyn DistanceSource>,
    metrics: Arc<Metrics>,
    conflict_retries: u32,
}

impl AssignmentEngine {
    pub fn new(
        store: Arc<dyn DeliveryStore>,
        distance: Arc<dyn DistanceSource>,
        metrics: Arc<Metrics>,
        conflict_retries: u32,
    ) -> Self {
        Self {
            store,
            distance,
            metrics,
            conflict_retries,
        }
    }

    /// Validates the order, picks a driver and persists the resulting delivery.
    ///
    /// Nothing is written unless a driver was selected and its booking was accepted by the
    /// store. A booking conflict re-runs the selection up to `conflict_retries` times.
    pub fn assign_driver(
        &self,
        customer: Option<&Customer>,
        restaurant: Option<&Restaurant>,
        delivery_time: Option<DateTime<Utc>>,
    ) -> Result<Delivery, AppError> {
        let start = Instant::now();
        let result = self.try_assign(customer, restaurant, delivery_time);
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(_) => self.metrics.observe_assignment("success", elapsed),
            Err(err) => {
                self.metrics.observe_assignment(err.kind(), elapsed);
                warn!(error = %err, kind = err.kind(), "driver assignment rejected");
            }
        }

        result
    }

    fn try_assign(
        &self,
        customer: Option<&Customer>,
        restaurant: Option<&Restaurant>,
        delivery_time: Option<DateTime<Utc>>,
    ) -> Result<Delivery, AppError> {
        let (customer, restaurant, delivery_time) =
            validate_request(customer, restaurant, delivery_time)?;
        let delivery_time = normalize_delivery_time(delivery_time);

        let mut attempt = 0;
        loop {
            let chosen = self.select_driver(restaurant.city_id, delivery_time)?;

            let distance_km = self.distance.next_distance_km();
            if !distance_km.is_finite() || distance_km <= 0.0 {
                return Err(AppError::Internal(format!(
                    "distance source produced {distance_km} km; expected a positive finite value"
                )));
            }

            let new_delivery = NewDelivery {
                driver_id: chosen.driver.id,
                restaurant_id: restaurant.id,
                customer_id: customer.id,
                delivery_time,
                distance_km,
            };

            match self.store.save_delivery(new_delivery) {
                Ok(delivery) => {
                    self.record_driver_total(delivery.driver_id);

                    info!(
                        delivery_id = %delivery.id,
                        driver_id = %delivery.driver_id,
                        driver = %chosen.driver.name,
                        restaurant_id = %restaurant.id,
                        customer_id = %customer.id,
                        delivery_time = %delivery.delivery_time,
                        distance_km = delivery.distance_km,
                        "driver assigned"
                    );
                    return Ok(delivery);
                }
                Err(AppError::ConcurrentAssignmentConflict { driver_id, .. })
                    if attempt < self.conflict_retries =>
                {
                    attempt += 1;
                    self.metrics.assignment_conflicts_total.inc();
                    warn!(
                        driver_id = %driver_id,
                        delivery_time = %delivery_time,
                        attempt,
                        "driver booked concurrently; selecting again"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Sets the distance gauge from the store, so concurrent saves cannot leave it behind.
    fn record_driver_total(&self, driver_id: Uuid) {
        match self.store.find_deliveries_by_driver(driver_id) {
            Ok(deliveries) => self
                .metrics
                .driver_total_distance_km
                .with_label_values(&[&driver_id.to_string()])
                .set(total_distance_km(&deliveries)),
            Err(err) => warn!(
                driver_id = %driver_id,
                error = %err,
                "failed to refresh driver distance gauge"
            ),
        }
    }

    fn select_driver(
        &self,
        city_id: Uuid,
        delivery_time: DateTime<Utc>,
    ) -> Result<Candidate, AppError> {
        let mut candidates = Vec::new();
        for driver in self.store.find_drivers_by_city(city_id)? {
            if self.store.is_driver_booked(driver.id, delivery_time)? {
                continue;
            }

            let deliveries = self.store.find_deliveries_by_driver(driver.id)?;
            candidates.push(Candidate {
                total_distance_km: total_distance_km(&deliveries),
                driver,
            });
        }

        pick_least_busy(candidates).ok_or(AppError::NoAvailableDriver {
            city_id,
            delivery_time,
        })
    }
}

fn validate_request<'a>(
    customer: Option<&'a Customer>,
    restaurant: Option<&'a Restaurant>,
    delivery_time: Option<DateTime<Utc>>,
) -> Result<(&'a Customer, &'a Restaurant, DateTime<Utc>), AppError> {
    let (Some(customer), Some(restaurant), Some(delivery_time)) =
        (customer, restaurant, delivery_time)
    else {
        return Err(AppError::InvalidArgument(format!(
            "customer, restaurant and delivery time are required (customer: {}, restaurant: {}, delivery time: {})",
            presence(customer.is_some()),
            presence(restaurant.is_some()),
            presence(delivery_time.is_some()),
        )));
    };

    if customer.city_id != restaurant.city_id {
        return Err(AppError::CityMismatch {
            customer_city: customer.city_id,
            restaurant_city: restaurant.city_id,
        });
    }

    Ok((customer, restaurant, delivery_time))
}

fn presence(present: bool) -> &'static str {
    if present { "present" } else { "missing" }
}
