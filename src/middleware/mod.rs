pub mod auth;

pub use auth::{
    cleared_session_cookie, resolve_session, session_auth_middleware, session_cookie, session_token,
};
