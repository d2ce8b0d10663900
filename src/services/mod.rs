pub mod generator;
pub mod particulars;
pub mod registration;
pub mod status;

pub use generator::{ParticularsGenerator, RandomGenerator};
pub use particulars::{CaregiverContact, ParticularsService, ParticularsView};
pub use registration::{RegistrationError, RegistrationService, StatusReceipt};
pub use status::StatusService;
