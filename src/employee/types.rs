//! Employee data types for the wire and the store.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::InvalidEmployeeId;

/// Store-assigned employee identifier.
///
/// Renders as the 24-character hex form of the underlying ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmployeeId(ObjectId);

impl EmployeeId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// The native ObjectId.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for EmployeeId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for EmployeeId {
    type Err = InvalidEmployeeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self).map_err(|e| InvalidEmployeeId {
            input: s.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// The client-writable part of an employee.
///
/// Used as the request body for create and update. Fields missing from the
/// body decode to their zero value, so an update always replaces all three.
/// Unknown keys, including any client-supplied `id`, are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EmployeeFields {
    /// Display name.
    #[schema(example = "Ada")]
    pub name: String,
    /// Salary.
    #[schema(example = 1000.0)]
    pub salary: f64,
    /// Age in years.
    #[schema(example = 30.0)]
    pub age: f64,
}

/// An employee as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Employee {
    /// Hex ObjectId; omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[schema(example = "64b7f0c2a1e4d3b2c1a09f87")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Salary.
    pub salary: f64,
    /// Age in years.
    pub age: f64,
}

impl Employee {
    /// Attach an id to a set of fields.
    pub fn from_fields(id: impl Into<String>, fields: EmployeeFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            salary: fields.salary,
            age: fields.age,
        }
    }

    /// Split off the writable fields.
    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            name: self.name.clone(),
            salary: self.salary,
            age: self.age,
        }
    }
}

/// Stored document shape in the `employees` collection.
///
/// `_id` is kept as raw BSON so documents written by other tools with a
/// non-ObjectId key still list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDocument {
    /// Native identifier.
    #[serde(rename = "_id")]
    pub id: Bson,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Salary.
    #[serde(default)]
    pub salary: f64,
    /// Age in years.
    #[serde(default)]
    pub age: f64,
}

/// Render a stored `_id` as the wire id.
fn render_id(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

impl From<EmployeeDocument> for Employee {
    fn from(doc: EmployeeDocument) -> Self {
        Self {
            id: render_id(doc.id),
            name: doc.name,
            salary: doc.salary,
            age: doc.age,
        }
    }
}
