pub mod annotation;
pub mod tiers;

pub use annotation::*;
pub use tiers::*;
