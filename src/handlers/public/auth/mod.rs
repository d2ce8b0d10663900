// handlers/public/auth - login and logout, no session required

pub mod session;

pub use session::{login, logout};
