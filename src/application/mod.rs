pub mod checkout_service;
pub mod in_flight;
