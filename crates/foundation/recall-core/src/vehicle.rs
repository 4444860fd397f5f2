//! Vehicle identification submitted by callers.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The make/model/year triple used to query the recall API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleIdentification {
    pub make: String,
    pub model: String,
    pub model_year: String,
}

impl VehicleIdentification {
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        model_year: impl Into<String>,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            model_year: model_year.into(),
        }
    }

    /// Validate an inbound JSON body.
    ///
    /// The body must be an object carrying non-blank `make`, `model` and
    /// `model_year`. A numeric `model_year` (`2020`) is accepted as text.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or(Error::NotAnObject)?;
        Self::from_map(obj)
    }

    /// Extract an identification embedded in a larger request body.
    ///
    /// Returns `Ok(None)` when none of the three fields are present, so a
    /// request can fall back to the stored vehicle. A partial triple is an
    /// error rather than a silent fallback.
    pub fn from_optional_fields(obj: &Map<String, Value>) -> Result<Option<Self>> {
        let present = ["make", "model", "model_year"]
            .iter()
            .any(|key| obj.get(*key).is_some_and(|v| !v.is_null()));
        if !present {
            return Ok(None);
        }
        Self::from_map(obj).map(Some)
    }

    fn from_map(obj: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            make: field(obj, "make")?,
            model: field(obj, "model")?,
            model_year: field(obj, "model_year")?,
        })
    }
}

fn field(obj: &Map<String, Value>, name: &'static str) -> Result<String> {
    match obj.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(Error::MissingField(name)),
        Some(_) => Err(Error::InvalidField(name)),
    }
}

impl fmt::Display for VehicleIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.model_year, self.make, self.model)
    }
}
