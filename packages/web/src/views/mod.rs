mod home;
pub use home::Home;

mod signup;
pub use signup::Signup;
