pub mod security;
pub mod session;
pub mod side;
pub mod tick;
