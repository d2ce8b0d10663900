pub mod admin;
pub mod db;
pub mod device;
pub mod particulars;
