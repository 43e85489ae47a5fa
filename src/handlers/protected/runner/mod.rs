// handlers/protected/runner/mod.rs - Runner area (/api/runner/*)

pub mod payments;
pub mod registrations;

pub use payments::payments_list;
pub use registrations::{registration_by_code, registration_create, registrations_list};
