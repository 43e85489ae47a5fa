// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT + role gate) → Elevated (admin JWT).
// Webhooks sit beside the tiers: they authenticate with a shared secret
// header instead of a user token.

pub mod elevated;
pub mod protected;
pub mod public;
pub mod webhooks;
