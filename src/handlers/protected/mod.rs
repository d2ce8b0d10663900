// handlers/protected - read API behind `session_auth_middleware`
//
// Every handler here receives the caller's `AuthSession` as an extension and
// applies the device gate before touching the store.

pub mod particulars;
pub mod status;
