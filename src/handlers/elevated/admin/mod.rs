// handlers/elevated/admin/mod.rs - /api/admin/* and admin-only writes

pub mod home_page;
pub mod rate_limit;
pub mod registrations;
pub mod stats;
pub mod users;

pub use home_page::home_page_put;
pub use rate_limit::rate_limit_reset;
pub use registrations::registrations_report;
pub use stats::stats_get;
pub use users::{role_grant, role_revoke, users_list};
