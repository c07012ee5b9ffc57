//! Patient addresses.

use serde::{Deserialize, Serialize};

/// A postal address attached to a patient.
///
/// The API reports the postal code as `zip_code` and echoes it as
/// `postal_code`; either key is accepted on input and `zip_code` is written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "WireAddress")]
pub struct Address {
    /// Server-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    #[serde(rename = "zip_code")]
    pub postal_code: String,
    /// Country, when the source supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Whether this is the patient's main address.
    pub is_primary: bool,
}

impl Address {
    /// Creates a non-primary address without an ID or country.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            street: street.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: None,
            is_primary: false,
        }
    }

    /// Marks the address as primary.
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Returns a single-line rendering, `street, city, state`.
    pub fn one_line(&self) -> String {
        format!("{}, {}, {}", self.street, self.city, self.state)
    }
}

#[derive(Deserialize)]
struct WireAddress {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    street: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    zip_code: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    is_primary: bool,
}

impl From<WireAddress> for Address {
    fn from(wire: WireAddress) -> Self {
        let postal_code = wire
            .zip_code
            .filter(|z| !z.is_empty())
            .or(wire.postal_code)
            .unwrap_or_default();
        Self {
            id: wire.id,
            street: wire.street,
            city: wire.city,
            state: wire.state,
            postal_code,
            country: wire.country.filter(|c| !c.is_empty()),
            is_primary: wire.is_primary,
        }
    }
}
