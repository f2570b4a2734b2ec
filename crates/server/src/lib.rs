pub mod errors;
pub mod events;
pub mod extract;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;
pub mod ws;

pub use routes::build_router;
pub use startup::{build_app, run};
