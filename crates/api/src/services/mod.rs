//! Business logic and upstream provider clients.

pub mod mailer;
pub mod news;
pub mod plant_health;
pub mod recommend;
pub mod verification;

pub use mailer::Mailer;
pub use news::NewsClient;
pub use plant_health::PlantHealthClient;
pub use verification::VerificationService;
