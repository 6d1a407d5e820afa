//! Core business logic - framework-agnostic rules shared by every storage adapter.

/// Users and the garden log
pub mod account;
/// Cart quantities and stock bookkeeping
pub mod cart;
/// Product filters and catalog inputs
pub mod catalog;
/// Progress Ledger rollover rules
pub mod ledger;
/// Two-place decimal amounts
pub mod money;
/// Notification kinds
pub mod notification;
/// Checkout validation and snapshots
pub mod order;
