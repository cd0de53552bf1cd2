pub mod invoice;
pub mod registration;
pub mod reports;
pub mod sync;
