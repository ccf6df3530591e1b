mod index;
pub use index::{Index, NotFound};

mod dashboards;
pub use dashboards::{AdminDashboardPage, LawyerDashboardPage};

mod reset_password;
pub use reset_password::ResetPasswordPage;
