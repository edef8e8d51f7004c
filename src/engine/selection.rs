use std::cmp::Ordering;

use chrono::{DateTime, SubsecRound, Utc};

use crate::models::delivery::{Delivery, DriverDistance};
use crate::models::driver::Driver;

/// Delivery times are stored and compared at millisecond precision.
const TIME_PRECISION_DIGITS: u16 = 3;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub driver: Driver,
    pub total_distance_km: f64,
}

pub fn normalize_delivery_time(delivery_time: DateTime<Utc>) -> DateTime<Utc> {
    delivery_time.trunc_subsecs(TIME_PRECISION_DIGITS)
}

pub fn total_distance_km(deliveries: &[Delivery]) -> f64 {
    deliveries.iter().map(|delivery| delivery.distance_km).sum()
}

/// Least total distance wins; equal totals fall back to the lower driver id.
pub fn pick_least_busy(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().min_by(|a, b| {
        a.total_distance_km
            .total_cmp(&b.total_distance_km)
            .then_with(|| a.driver.id.cmp(&b.driver.id))
    })
}

/// Descending by total distance, then ascending by driver id.
pub fn rank_by_distance(rows: &mut [DriverDistance]) {
    rows.sort_by(|a, b| match b.total_distance_km.total_cmp(&a.total_distance_km) {
        Ordering::Equal => a.driver.id.cmp(&b.driver.id),
        other => other,
    });
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike, Utc};
    use uuid::Uuid;

    use super::{
        normalize_delivery_time, pick_least_busy, rank_by_distance, total_distance_km, Candidate,
    };
    use crate::models::delivery::{Delivery, DriverDistance};
    use crate::models::driver::Driver;

    fn driver(id_seed: u128) -> Driver {
        Driver {
            id: Uuid::from_u128(id_seed),
            name: format!("driver-{id_seed}"),
            city_id: Uuid::from_u128(1),
        }
    }

    fn candidate(id_seed: u128, total_distance_km: f64) -> Candidate {
        Candidate {
            driver: driver(id_seed),
            total_distance_km,
        }
    }

    #[test]
    fn least_total_distance_wins() {
        let picked = pick_least_busy(vec![candidate(1, 5.0), candidate(2, 0.0), candidate(3, 2.5)])
            .unwrap();
        assert_eq!(picked.driver.id, Uuid::from_u128(2));
    }

    #[test]
    fn ties_go_to_lowest_driver_id_regardless_of_input_order() {
        let forward = pick_least_busy(vec![candidate(4, 1.0), candidate(9, 1.0)]).unwrap();
        let reversed = pick_least_busy(vec![candidate(9, 1.0), candidate(4, 1.0)]).unwrap();

        assert_eq!(forward.driver.id, Uuid::from_u128(4));
        assert_eq!(reversed.driver.id, Uuid::from_u128(4));
    }

    #[test]
    fn empty_candidate_list_picks_nobody() {
        assert!(pick_least_busy(Vec::new()).is_none());
    }

    #[test]
    fn total_distance_is_zero_without_deliveries() {
        assert_eq!(total_distance_km(&[]), 0.0);
    }

    #[test]
    fn total_distance_sums_deliveries() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let deliveries: Vec<Delivery> = [2.0, 3.25]
            .iter()
            .map(|distance_km| Delivery {
                id: Uuid::new_v4(),
                driver_id: Uuid::from_u128(1),
                restaurant_id: Uuid::from_u128(2),
                customer_id: Uuid::from_u128(3),
                delivery_time: at,
                distance_km: *distance_km,
                created_at: at,
            })
            .collect();

        assert!((total_distance_km(&deliveries) - 5.25).abs() < 1e-9);
    }

    #[test]
    fn ranking_sorts_descending_with_id_tie_break() {
        let mut rows = vec![
            DriverDistance {
                driver: driver(3),
                total_distance_km: 4.0,
            },
            DriverDistance {
                driver: driver(1),
                total_distance_km: 9.0,
            },
            DriverDistance {
                driver: driver(2),
                total_distance_km: 4.0,
            },
        ];

        rank_by_distance(&mut rows);

        let order: Vec<Uuid> = rows.iter().map(|row| row.driver.id).collect();
        assert_eq!(
            order,
            vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]
        );
    }

    #[test]
    fn normalization_truncates_below_milliseconds() {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();

        assert_eq!(normalize_delivery_time(at).nanosecond(), 123_000_000);
    }
}
