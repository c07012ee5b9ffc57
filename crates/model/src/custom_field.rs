//! Administrator-defined custom fields and the values patients carry for them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Server-assigned identifier of a custom field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFieldId(u64);

impl CustomFieldId {
    /// Creates a new custom field ID.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric ID.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CustomFieldId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CustomFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared type of a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum FieldType {
    /// Free text.
    Text,
    /// Decimal number.
    Number,
    /// Calendar date.
    Date,
}

impl FieldType {
    /// Every field type.
    pub const ALL: [FieldType; 3] = [FieldType::Text, FieldType::Number, FieldType::Date];

    /// Returns the wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Number => "NUMBER",
            FieldType::Date => "DATE",
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
        }
    }

    /// Comma-separated list of the accepted wire codes.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TEXT" => Ok(FieldType::Text),
            "NUMBER" => Ok(FieldType::Number),
            "DATE" => Ok(FieldType::Date),
            _ => Err(ModelError::InvalidFieldType {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A custom field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Server-assigned identifier.
    pub id: CustomFieldId,
    /// Field name shown on forms.
    pub name: String,
    /// Declared value type.
    pub field_type: FieldType,
    /// Whether every patient must carry a value.
    #[serde(default)]
    pub is_required: bool,
    /// When the definition was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the definition was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CustomField {
    /// Creates an optional field definition.
    pub fn new(id: impl Into<CustomFieldId>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            is_required: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

/// A borrowed view of whichever typed slot of a [`CustomFieldValue`] is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Text slot.
    Text(&'a str),
    /// Number slot.
    Number(Decimal),
    /// Date slot.
    Date(NaiveDate),
}

impl FieldValue<'_> {
    /// Returns the type of the slot this value came from.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Date(_) => FieldType::Date,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::Number(number) => write!(f, "{}", number),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// A patient's value for one custom field.
///
/// Exactly one typed slot is meaningful, selected by the field's declared
/// type. Nothing enforces this on decode; [`CustomFieldValue::value`]
/// applies the display-time fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomFieldValue {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Definition reference. Write-only on the API, so usually absent on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field: Option<CustomFieldId>,

    /// Name of the definition.
    #[serde(default)]
    pub field_name: String,

    /// Declared type of the definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    /// Text slot.
    #[serde(default)]
    pub text_value: Option<String>,

    /// Number slot. The API sends decimals as strings.
    #[serde(default)]
    pub number_value: Option<Decimal>,

    /// Date slot.
    #[serde(default)]
    pub date_value: Option<NaiveDate>,
}

impl CustomFieldValue {
    /// Creates a text value for the named field.
    pub fn text(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: Some(FieldType::Text),
            text_value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Creates a number value for the named field.
    pub fn number(field_name: impl Into<String>, value: Decimal) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: Some(FieldType::Number),
            number_value: Some(value),
            ..Default::default()
        }
    }

    /// Creates a date value for the named field.
    pub fn date(field_name: impl Into<String>, value: NaiveDate) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: Some(FieldType::Date),
            date_value: Some(value),
            ..Default::default()
        }
    }

    /// Sets the definition reference.
    pub fn with_field(mut self, id: impl Into<CustomFieldId>) -> Self {
        self.custom_field = Some(id.into());
        self
    }

    /// Returns every populated slot in text, number, date order.
    ///
    /// A blank text slot counts as unpopulated.
    pub fn populated(&self) -> Vec<FieldValue<'_>> {
        let mut slots = Vec::with_capacity(1);
        if let Some(text) = self.text_value.as_deref().filter(|t| !t.is_empty()) {
            slots.push(FieldValue::Text(text));
        }
        if let Some(number) = self.number_value {
            slots.push(FieldValue::Number(number));
        }
        if let Some(date) = self.date_value {
            slots.push(FieldValue::Date(date));
        }
        slots
    }

    /// Returns the meaningful value.
    ///
    /// The slot of the declared type wins when populated; otherwise the first
    /// populated slot is used.
    pub fn value(&self) -> Option<FieldValue<'_>> {
        let slots = self.populated();
        self.field_type
            .and_then(|declared| slots.iter().copied().find(|v| v.field_type() == declared))
            .or_else(|| slots.first().copied())
    }

    /// Returns the meaningful value rendered as text, empty when unset.
    pub fn display_value(&self) -> String {
        self.value().map(|v| v.to_string()).unwrap_or_default()
    }

    /// Returns true if this value belongs to the given definition.
    ///
    /// Values read back from the API carry only the field name and type, so
    /// those are compared when the reference is absent.
    pub fn belongs_to(&self, field: &CustomField) -> bool {
        match self.custom_field {
            Some(id) => id == field.id,
            None => {
                self.field_name == field.name
                    && self.field_type.is_none_or(|t| t == field.field_type)
            }
        }
    }
}
