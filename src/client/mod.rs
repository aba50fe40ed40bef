pub mod flight_api;
pub mod flight_store;

pub use flight_api::{FlightTransport, HttpFlightTransport};
pub use flight_store::{filter_flights, FlightDraft, FlightFilter, FlightRecord, FlightStore};
