pub mod root;
pub mod reservations;
