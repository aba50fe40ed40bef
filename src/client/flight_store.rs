use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{client::flight_api::FlightTransport, error::Result};

/// One flight as returned by the flight resource API. Ids are opaque strings
/// owned by that service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlightRecord {
    #[serde(rename = "flightID")]
    pub flight_id: String,
    #[serde(rename = "airlineID")]
    pub airline_id: String,
    pub departure: String,
    #[serde(rename = "departureDate")]
    pub departure_date: String,
    #[serde(rename = "departureTime")]
    pub departure_time: String,
    pub destination: String,
    #[serde(rename = "arrivalDate")]
    pub arrival_date: String,
    #[serde(rename = "arrivalTime")]
    pub arrival_time: String,
    #[serde(rename = "stopOvers", deserialize_with = "de_stop_overs", default)]
    pub stop_overs: Vec<String>,
    pub duration: i64,
    #[serde(rename = "aircraftID")]
    pub aircraft_id: String,
    #[serde(rename = "flightStatus")]
    pub status: String,
    pub price: f64,
}

/// Body for creating or replacing a flight.
#[derive(Debug, Clone, Serialize)]
pub struct FlightDraft {
    #[serde(rename = "airlineID")]
    pub airline_id: String,
    pub departure: String,
    #[serde(rename = "departureDate")]
    pub departure_date: String,
    #[serde(rename = "departureTime")]
    pub departure_time: String,
    pub destination: String,
    #[serde(rename = "arrivalDate")]
    pub arrival_date: String,
    #[serde(rename = "arrivalTime")]
    pub arrival_time: String,
    #[serde(rename = "stopOvers")]
    pub stop_overs: Vec<String>,
    pub duration: i64,
    #[serde(rename = "aircraftID")]
    pub aircraft_id: String,
    pub status: String,
    pub price: f64,
}

/// The API serves `stopOvers` either as an array or as a comma-separated
/// string; normalize both into a list.
fn de_stop_overs<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Csv(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Raw::List(list)) => Ok(list),
        Some(Raw::Csv(csv)) => Ok(csv
            .split(',')
            .map(|stop| stop.trim().to_string())
            .filter(|stop| !stop.is_empty())
            .collect()),
    }
}

/// Derived-view criteria over a flight snapshot.
#[derive(Debug, Clone, Default)]
pub struct FlightFilter {
    pub airline_id: String,
    /// Case-insensitive substring match against the flight id.
    pub query: String,
    /// `None` or `"all"` matches every status.
    pub status: Option<String>,
}

/// Pure filter over an immutable snapshot.
pub fn filter_flights<'a>(
    flights: &'a [FlightRecord],
    filter: &FlightFilter,
) -> Vec<&'a FlightRecord> {
    if filter.airline_id.is_empty() {
        return Vec::new();
    }
    let query = filter.query.trim().to_lowercase();

    flights
        .iter()
        .filter(|flight| {
            let match_airline = flight.airline_id == filter.airline_id;
            let match_query = query.is_empty() || flight.flight_id.to_lowercase().contains(&query);
            let match_status = match filter.status.as_deref() {
                None | Some("all") => true,
                Some(status) => flight.status == status,
            };
            match_airline && match_query && match_status
        })
        .collect()
}

/// Client-side repository for the flight list. Holds a full snapshot and
/// re-fetches it wholesale after every mutation; no optimistic or partial
/// updates.
pub struct FlightStore {
    transport: Arc<dyn FlightTransport>,
    flights: Vec<FlightRecord>,
}

impl FlightStore {
    pub fn new(transport: Arc<dyn FlightTransport>) -> Self {
        Self {
            transport,
            flights: Vec::new(),
        }
    }

    pub fn flights(&self) -> &[FlightRecord] {
        &self.flights
    }

    pub fn find(&self, flight_id: &str) -> Option<&FlightRecord> {
        self.flights.iter().find(|f| f.flight_id == flight_id)
    }

    pub fn filter(&self, filter: &FlightFilter) -> Vec<&FlightRecord> {
        filter_flights(&self.flights, filter)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.flights = self.transport.fetch_all().await?;
        Ok(())
    }

    pub async fn add(&mut self, draft: FlightDraft) -> Result<()> {
        self.transport.create(&draft).await?;
        self.refresh().await
    }

    pub async fn update(&mut self, flight_id: &str, draft: FlightDraft) -> Result<()> {
        self.transport.update(flight_id, &draft).await?;
        self.refresh().await
    }

    pub async fn remove(&mut self, flight_id: &str) -> Result<()> {
        self.transport.delete(flight_id).await?;
        self.refresh().await
    }
}
