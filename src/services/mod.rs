//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle validation and orchestrate repository calls.

pub mod accounts_service;
pub mod fault_injection;
