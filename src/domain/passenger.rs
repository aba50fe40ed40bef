use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity fields supplied with a Confirmed booking. Every field is
/// optional; the row can be created sparse and filled in later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub passport_number: Option<String>,
}
