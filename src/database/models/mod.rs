pub mod event;
pub mod pickup_location;
pub mod registration;
pub mod settings;
pub mod user;

pub use event::Event;
pub use pickup_location::KitPickupLocation;
pub use registration::{PaymentHistoryEntry, Registration, RegistrationReportRow, RunnerRegistration};
pub use settings::{HomePageSettings, OrganizerSettings};
pub use user::{User, UserSummary};
