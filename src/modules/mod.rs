pub mod auth;
pub mod customer;
pub mod message;

mod router;
pub use router::get_router;
