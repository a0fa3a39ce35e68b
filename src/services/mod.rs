pub mod request_service;
pub use request_service::{BoardSnapshot, Outcome, Rejection, RequestError, RequestService};

pub mod request_service_impl;
pub use request_service_impl::SeaOrmRequestService;
