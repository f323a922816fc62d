pub mod auth;
pub mod dashboard;
pub mod imports;
pub mod notifications;
pub mod system;
pub mod users;

pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use imports::ImportService;
pub use notifications::NotificationService;
pub use system::SystemService;
pub use users::UserService;
