use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A driver only serves restaurants located in its home city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
}
