// handlers/public/auth/mod.rs - Token acquisition

pub mod login;
pub mod register;
pub mod utils;

pub use login::login_post;
pub use register::register_post;
