pub mod assignment;
pub mod distance;
pub mod ranking;
pub mod selection;
