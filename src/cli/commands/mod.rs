pub mod database;
pub mod password;
pub mod rate_limit;
pub mod roles;
pub mod server;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
