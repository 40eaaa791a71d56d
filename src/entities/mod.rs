pub mod fare;
pub mod ride;
