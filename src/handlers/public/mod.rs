// handlers/public - endpoints reachable without a session
//
// Devices post status reports here, browsers log in and out, and the two
// pages are served from here (the dashboard redirects when no session exists).

pub mod auth;
pub mod device;
pub mod pages;
