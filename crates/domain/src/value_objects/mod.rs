//! Value objects - immutable-by-default building blocks of the domain.

mod health;
mod names;
mod placement;
mod progression;

pub use health::Health;
pub use names::EntityName;
pub use placement::Placement;
pub use progression::{
    Experience, Level, BASE_MAX_HEALTH, EXPERIENCE_PER_LEVEL, MAX_HEALTH_PER_LEVEL,
};
