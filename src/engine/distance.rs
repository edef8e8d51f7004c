use crate::error::AppError;

/// Produces the distance recorded on a new delivery. The engine rejects values that are not
/// finite and positive.
pub trait DistanceSource: Send + Sync {
    fn next_distance_km(&self) -> f64;
}

/// Uniformly random distance within `[min_km, max_km]`.
#[derive(Debug, Clone)]
pub struct RandomDistance {
    min_km: f64,
    max_km: f64,
}

impl RandomDistance {
    pub fn new(min_km: f64, max_km: f64) -> Result<Self, AppError> {
        check_bounds(min_km, max_km)?;
        Ok(Self { min_km, max_km })
    }
}

impl DistanceSource for RandomDistance {
    fn next_distance_km(&self) -> f64 {
        rand::random_range(self.min_km..=self.max_km)
    }
}

/// Bounds must be finite with `0 < min <= max`.
pub fn check_bounds(min_km: f64, max_km: f64) -> Result<(), AppError> {
    if !min_km.is_finite() || !max_km.is_finite() {
        return Err(AppError::Internal(
            "distance bounds must be finite".to_string(),
        ));
    }
    if min_km <= 0.0 {
        return Err(AppError::Internal(format!(
            "minimum distance must be > 0 km, got {min_km}"
        )));
    }
    if max_km < min_km {
        return Err(AppError::Internal(format!(
            "maximum distance ({max_km} km) must be >= minimum distance ({min_km} km)"
        )));
    }
    Ok(())
}
