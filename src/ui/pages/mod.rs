pub mod admin;
pub mod compare;
pub mod dashboard;
pub mod login;
pub mod project_detail;
pub mod settings;

pub use admin::{AdminPlacesPage, AdminProjectsPage, AdminPropertyTypesPage, AdminUsersPage};
pub use compare::ComparePage;
pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use project_detail::ProjectDetailPage;
pub use settings::SettingsPage;
