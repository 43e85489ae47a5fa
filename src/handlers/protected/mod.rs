// handlers/protected/mod.rs - Handlers behind `jwt_auth_middleware`
//
// Route groups add a role gate on top: runner routes use `require_runner`,
// organizer and upload routes use `require_organizer`. `/api/auth/me` and
// the profile routes only need a valid token.

pub mod auth;
pub mod organizer;
pub mod profiles;
pub mod runner;
pub mod uploads;
