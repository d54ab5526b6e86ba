//! # ClassWatch Providers
//!
//! The two external availability sources and the adapter that
//! normalizes them behind [`classwatch_core::AvailabilityProvider`]:
//! a structured catalog search API (class lookups) and the public
//! class-list page (course-id lookups, occupancy scraped from text).

pub mod catalog;
pub mod lookup;
pub mod pages;

pub use catalog::CatalogClient;
pub use lookup::SeatLookup;
pub use pages::PageClient;
