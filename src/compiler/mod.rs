pub mod loader;
pub mod validator;
