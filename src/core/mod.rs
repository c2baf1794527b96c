//! Core business logic for `PermitDesk`.
//!
//! Leaf-first: `catalog` defines what is sellable, `instances` materializes
//! the numbered cards, `reservation` claims them for a buyer, `sweeper`
//! reclaims stale claims, and `orders` converts claims into sales records.
//! `access` holds the buyer-for-recipient authorization shared by
//! reservation and order creation.

/// Buyer/recipient authorization
pub mod access;
/// Permit -> option -> period catalog operations
pub mod catalog;
/// Permit instance generation and range synchronization
pub mod instances;
/// Order finalization: pricing, numbering, sold transition
pub mod orders;
/// Atomic reservation of available instances
pub mod reservation;
/// Background release of expired reservations
pub mod sweeper;
