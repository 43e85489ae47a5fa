// handlers/protected/auth/mod.rs - Session introspection

pub mod me;

pub use me::me_get;
