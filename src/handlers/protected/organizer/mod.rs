// handlers/protected/organizer/mod.rs - Organizer area (/api/organizer/*)
//
// Every lookup is scoped with `AuthUser::owner_scope`, so an organizer asking
// for someone else's event gets a 404 and admins reach any event.

pub mod dashboard;
pub mod events;
pub mod pickup_locations;
pub mod settings;

pub use dashboard::dashboard_get;
pub use events::{event_create, event_get, event_registrations, event_update, events_list};
pub use pickup_locations::{pickup_location_create, pickup_location_delete, pickup_location_update};
pub use settings::{settings_get, settings_put};
