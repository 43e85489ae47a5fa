// handlers/webhooks/mod.rs - Inbound provider callbacks
//
// Authenticated by `asaas_webhook_middleware`, never by a user token.

pub mod asaas;

pub use asaas::asaas_post;
