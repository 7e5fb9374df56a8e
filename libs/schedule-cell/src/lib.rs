pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::{public_routes, schedule_routes};
pub use services::booking::BookingService;
pub use services::registry::SlotRegistry;
pub use services::waitlist::Waitlist;
