pub mod reservation;
pub mod payment;
pub mod passenger;
pub mod seat;
pub mod pricing;
pub mod transition;

pub use reservation::*;
pub use payment::*;
pub use passenger::*;
pub use seat::*;
pub use pricing::*;
pub use transition::*;
