pub mod address_service;
pub mod event_service;
pub mod payment_webhook_service;
pub mod pickup_location_service;
pub mod registration_service;
pub mod settings_service;
pub mod stats_service;
pub mod upload_service;
pub mod user_service;

pub use address_service::{Address, AddressError, AddressLookup, ViaCepClient};
pub use event_service::{EventListQuery, EventService, EventUpdate, NewEvent};
pub use payment_webhook_service::{AsaasWebhook, PaymentWebhookService, WebhookOutcome};
pub use pickup_location_service::{PickupLocationInput, PickupLocationService};
pub use registration_service::{NewRegistration, PaymentUpdate, RegistrationReportQuery, RegistrationService};
pub use settings_service::{HomePageSettingsInput, OrganizerSettingsInput, SettingsService};
pub use stats_service::{AdminStats, OrganizerDashboard, StatsService};
pub use upload_service::{StoredUpload, UploadError, UploadKind, UploadService};
pub use user_service::{ProfileUpdate, UserService};
