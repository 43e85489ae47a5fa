// handlers/elevated/mod.rs - Admin-only handlers
//
// Mounted behind `jwt_auth_middleware` + `require_admin`.

pub mod admin;
