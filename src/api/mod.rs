//! API endpoint modules.

pub mod attachments;
pub mod health;
pub mod openapi;
pub mod test_phases;
pub mod test_runs;

pub use attachments::configure_routes as configure_attachment_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use test_phases::configure_routes as configure_test_phase_routes;
pub use test_runs::configure_routes as configure_test_run_routes;
