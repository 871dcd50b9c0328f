//! Service layer of the Pricing API.

pub mod quote_service;

pub use quote_service::{BatchEntry, BatchResponse, QuoteService, QuoteSettings};
