//! Quill event bus and notification infrastructure.
//!
//! This crate provides the outbound side-effect channel of the editing
//! workflow:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical domain event envelope.
//! - [`delivery`] — SMTP email delivery via `lettre`.
//! - [`Notifier`] — fire-and-forget facade used by request handlers; a
//!   failed or unconfigured delivery never surfaces to the caller.

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{DomainEvent, EventBus};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use notifier::{Notification, Notifier};
