//! Domain models for the API.

pub mod listing;
pub mod order;
pub mod prediction;
pub mod scheme;
pub mod session;
pub mod user;

pub use listing::Listing;
pub use order::Order;
pub use prediction::{DiseaseFinding, DiseasePrediction, DiseaseReport};
pub use scheme::Scheme;
pub use session::{CurrentUser, session_keys};
pub use user::{Profile, User};
