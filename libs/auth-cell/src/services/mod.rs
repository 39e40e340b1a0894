pub mod login;
pub mod password;

pub use login::AuthService;
pub use password::PasswordService;
