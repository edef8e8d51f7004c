//! Scenario files: a seed data set plus a list of orders to run through the engine.
//!
//! Entities are referenced by name. An order naming an unknown customer or restaurant is passed
//! to the engine with that argument absent, so it is reported as an invalid argument.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::models::city::City;
use crate::models::delivery::{Delivery, DriverDistance};
use crate::state::AppState;
use crate::store::MemoryStore;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub cities: Vec<String>,
    #[serde(default)]
    pub drivers: Vec<DriverSeed>,
    #[serde(default)]
    pub customers: Vec<CustomerSeed>,
    #[serde(default)]
    pub restaurants: Vec<RestaurantSeed>,
    #[serde(default)]
    pub orders: Vec<OrderSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverSeed {
    pub name: String,
    pub city: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerSeed {
    pub name: String,
    pub city: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantSeed {
    pub name: String,
    pub city: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderSeed {
    pub customer: Option<String>,
    pub restaurant: Option<String>,
    pub delivery_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderOutcome {
    Assigned {
        customer: Option<String>,
        restaurant: Option<String>,
        driver: String,
        delivery: Delivery,
    },
    Rejected {
        customer: Option<String>,
        restaurant: Option<String>,
        kind: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub outcomes: Vec<OrderOutcome>,
    pub ranking: Vec<DriverDistance>,
    pub ranking_by_city: BTreeMap<String, Vec<DriverDistance>>,
}

impl Scenario {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            AppError::Internal(format!("failed to read scenario {}: {err}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw)
            .map_err(|err| AppError::Internal(format!("invalid scenario: {err}")))
    }

    /// Loads every city, driver, customer and restaurant into `store`.
    pub fn seed(&self, store: &MemoryStore) -> Result<(), AppError> {
        let mut cities: HashMap<&str, City> = HashMap::new();
        for name in &self.cities {
            if cities.contains_key(name.as_str()) {
                return Err(AppError::Internal(format!("duplicate city {name}")));
            }
            cities.insert(name.as_str(), store.add_city(name));
        }

        let city = |name: &str| {
            cities
                .get(name)
                .ok_or_else(|| AppError::NotFound(format!("city {name} not found")))
        };

        for seed in &self.drivers {
            store.add_driver(&seed.name, city(&seed.city)?);
        }
        for seed in &self.customers {
            store.add_customer(&seed.name, city(&seed.city)?, &seed.address);
        }
        for seed in &self.restaurants {
            store.add_restaurant(&seed.name, city(&seed.city)?, &seed.description);
        }

        info!(
            cities = self.cities.len(),
            drivers = self.drivers.len(),
            customers = self.customers.len(),
            restaurants = self.restaurants.len(),
            "scenario seeded"
        );
        Ok(())
    }

    /// Runs every order in file order, then builds the global and per-city rankings.
    pub fn run(&self, state: &AppState) -> Result<ScenarioReport, AppError> {
        let mut outcomes = Vec::with_capacity(self.orders.len());

        for order in &self.orders {
            let customer = order
                .customer
                .as_deref()
                .and_then(|name| state.store.customer_by_name(name));
            let restaurant = order
                .restaurant
                .as_deref()
                .and_then(|name| state.store.restaurant_by_name(name));

            let outcome = match state.engine.assign_driver(
                customer.as_ref(),
                restaurant.as_ref(),
                order.delivery_time,
            ) {
                Ok(delivery) => OrderOutcome::Assigned {
                    customer: order.customer.clone(),
                    restaurant: order.restaurant.clone(),
                    driver: state
                        .store
                        .driver(delivery.driver_id)
                        .map(|driver| driver.name)
                        .unwrap_or_default(),
                    delivery,
                },
                Err(err @ AppError::Internal(_)) => return Err(err),
                Err(err) => OrderOutcome::Rejected {
                    customer: order.customer.clone(),
                    restaurant: order.restaurant.clone(),
                    kind: err.kind().to_string(),
                    error: err.to_string(),
                },
            };
            outcomes.push(outcome);
        }

        let mut ranking_by_city = BTreeMap::new();
        for city in state.store.cities() {
            let rows = state.reporter.rank_drivers_by_city(&city)?;
            ranking_by_city.insert(city.name, rows);
        }

        Ok(ScenarioReport {
            outcomes,
            ranking: state.reporter.rank_drivers()?,
            ranking_by_city,
        })
    }
}
