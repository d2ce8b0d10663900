pub mod particulars;
pub mod status_event;

pub use particulars::UserParticulars;
pub use status_event::{LatestStatus, StatusEvent};
