// handlers/public/mod.rs - Handlers reachable without a token
//
// Login and register sit behind the per-client rate limiter; everything
// else here is read-only.

pub mod address;
pub mod auth;
pub mod events;
pub mod home_page;
