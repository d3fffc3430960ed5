//! Core data models for the tournament engine.

mod adjudicator;
mod ids;
mod pairing;
mod round;
mod standing;
mod team;
mod tournament;

pub use adjudicator::*;
pub use ids::*;
pub use pairing::*;
pub use round::*;
pub use standing::*;
pub use team::*;
pub use tournament::*;
