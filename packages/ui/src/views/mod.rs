mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod loading;
pub use loading::LoadingScreen;

mod public_page;
pub use public_page::PublicPage;

mod lawyer_dashboard;
pub use lawyer_dashboard::LawyerDashboard;

mod admin_dashboard;
pub use admin_dashboard::AdminDashboard;

mod reset_password;
pub use reset_password::ResetPassword;
