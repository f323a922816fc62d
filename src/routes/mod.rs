pub mod auth;

pub mod dashboard;

pub mod imports;

pub mod resources;

pub mod system;

pub mod users;

pub use auth::configure_auth_routes;
pub use dashboard::configure_dashboard_routes;
pub use imports::configure_import_routes;
pub use resources::configure_resource_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
