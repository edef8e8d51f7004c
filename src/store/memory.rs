use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::city::City;
use crate::models::customer::Customer;
use crate::models::delivery::{Delivery, DriverDistance, NewDelivery};
use crate::models::driver::Driver;
use crate::models::restaurant::Restaurant;
use crate::store::DeliveryStore;

/// Concurrent in-memory store. Bookings are indexed by (driver, delivery time) and the index
/// entry is claimed before the delivery is written, so two saves for the same slot cannot both
/// succeed.
#[derive(Default)]
pub struct MemoryStore {
    cities: DashMap<Uuid, City>,
    customers: DashMap<Uuid, Customer>,
    restaurants: DashMap<Uuid, Restaurant>,
    drivers: DashMap<Uuid, Driver>,
    deliveries: DashMap<Uuid, Delivery>,
    deliveries_by_driver: DashMap<Uuid, Vec<Uuid>>,
    bookings: DashMap<(Uuid, DateTime<Utc>), Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_city(&self, name: &str) -> City {
        let city = City {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.cities.insert(city.id, city.clone());
        city
    }

    pub fn add_customer(&self, name: &str, city: &City, address: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city_id: city.id,
            address: address.to_string(),
        };
        self.customers.insert(customer.id, customer.clone());
        customer
    }

    pub fn add_restaurant(&self, name: &str, city: &City, description: &str) -> Restaurant {
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city_id: city.id,
            description: description.to_string(),
        };
        self.restaurants.insert(restaurant.id, restaurant.clone());
        restaurant
    }

    pub fn add_driver(&self, name: &str, city: &City) -> Driver {
        self.insert_driver(Driver {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city_id: city.id,
        })
    }

    /// Registers a driver with a caller-chosen id.
    pub fn insert_driver(&self, driver: Driver) -> Driver {
        self.drivers.insert(driver.id, driver.clone());
        driver
    }

    pub fn city_by_name(&self, name: &str) -> Option<City> {
        find_by(&self.cities, |city| city.name == name)
    }

    pub fn customer_by_name(&self, name: &str) -> Option<Customer> {
        find_by(&self.customers, |customer| customer.name == name)
    }

    pub fn restaurant_by_name(&self, name: &str) -> Option<Restaurant> {
        find_by(&self.restaurants, |restaurant| restaurant.name == name)
    }

    pub fn driver_by_name(&self, name: &str) -> Option<Driver> {
        find_by(&self.drivers, |driver| driver.name == name)
    }

    pub fn driver(&self, id: Uuid) -> Option<Driver> {
        self.drivers.get(&id).map(|entry| entry.value().clone())
    }

    pub fn cities(&self) -> Vec<City> {
        let mut cities: Vec<City> = self
            .cities
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        cities
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.len()
    }

    fn driver_totals<F>(&self, include: F) -> Vec<DriverDistance>
    where
        F: Fn(&Driver) -> bool,
    {
        let mut totals: HashMap<Uuid, f64> = HashMap::new();
        for entry in self.deliveries.iter() {
            *totals.entry(entry.driver_id).or_insert(0.0) += entry.distance_km;
        }

        totals
            .into_iter()
            .filter_map(|(driver_id, total_distance_km)| {
                let driver = self.driver(driver_id)?;
                include(&driver).then_some(DriverDistance {
                    driver,
                    total_distance_km,
                })
            })
            .collect()
    }
}

fn find_by<T, F>(map: &DashMap<Uuid, T>, predicate: F) -> Option<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    map.iter()
        .find(|entry| predicate(entry.value()))
        .map(|entry| entry.value().clone())
}

impl DeliveryStore for MemoryStore {
    fn find_drivers_by_city(&self, city_id: Uuid) -> Result<Vec<Driver>, AppError> {
        let mut drivers: Vec<Driver> = self
            .drivers
            .iter()
            .filter(|entry| entry.city_id == city_id)
            .map(|entry| entry.value().clone())
            .collect();
        drivers.sort_by_key(|driver| driver.id);
        Ok(drivers)
    }

    fn find_deliveries_by_driver(&self, driver_id: Uuid) -> Result<Vec<Delivery>, AppError> {
        let ids = match self.deliveries_by_driver.get(&driver_id) {
            Some(ids) => ids.value().clone(),
            None => return Ok(Vec::new()),
        };

        let mut deliveries: Vec<Delivery> = ids
            .iter()
            .filter_map(|id| self.deliveries.get(id).map(|entry| entry.value().clone()))
            .collect();
        deliveries.sort_by_key(|delivery| delivery.delivery_time);
        Ok(deliveries)
    }

    fn is_driver_booked(
        &self,
        driver_id: Uuid,
        delivery_time: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        Ok(self.bookings.contains_key(&(driver_id, delivery_time)))
    }

    fn find_all_driver_totals(&self) -> Result<Vec<DriverDistance>, AppError> {
        Ok(self.driver_totals(|_| true))
    }

    fn find_driver_totals_by_city(&self, city_id: Uuid) -> Result<Vec<DriverDistance>, AppError> {
        Ok(self.driver_totals(|driver| driver.city_id == city_id))
    }

    fn save_delivery(&self, delivery: NewDelivery) -> Result<Delivery, AppError> {
        if !self.drivers.contains_key(&delivery.driver_id) {
            return Err(AppError::NotFound(format!(
                "driver {} not found",
                delivery.driver_id
            )));
        }

        match self
            .bookings
            .entry((delivery.driver_id, delivery.delivery_time))
        {
            Entry::Occupied(_) => Err(AppError::ConcurrentAssignmentConflict {
                driver_id: delivery.driver_id,
                delivery_time: delivery.delivery_time,
            }),
            Entry::Vacant(slot) => {
                let saved = Delivery {
                    id: Uuid::new_v4(),
                    driver_id: delivery.driver_id,
                    restaurant_id: delivery.restaurant_id,
                    customer_id: delivery.customer_id,
                    delivery_time: delivery.delivery_time,
                    distance_km: delivery.distance_km,
                    created_at: Utc::now(),
                };

                slot.insert(saved.id);
                self.deliveries.insert(saved.id, saved.clone());
                self.deliveries_by_driver
                    .entry(saved.driver_id)
                    .or_default()
                    .push(saved.id);

                Ok(saved)
            }
        }
    }
}
