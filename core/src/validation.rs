// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Declarative validation of untrusted form submissions.
//!
//! Every entity that can be created from a form describes its fields as a static `Schema`.  The
//! schema is checked against a `RawForm` before any business logic runs: the outcome is either the
//! typed, normalized entity or the full list of field errors, never a partially-built value.
//!
//! Forms use bracketed keys to nest the fields of an entity under its name, so a campground's title
//! arrives as `campground[title]=...`.  Keys that do not belong to the entity are ignored.
//!
//! Validation never mutates state and never performs I/O.

use crate::model::{ModelError, ModelResult};
use std::collections::BTreeMap;

/// The type and constraints of a single field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    /// A non-empty string.
    Text,

    /// A finite floating point number within an optional inclusive range.
    Number {
        /// Minimum accepted value, if any.
        min: Option<f64>,

        /// Maximum accepted value, if any.
        max: Option<f64>,
    },

    /// An integer within an optional inclusive range.  Numbers with a zero fractional part, such
    /// as `3.0`, are accepted as integers.
    Integer {
        /// Minimum accepted value, if any.
        min: Option<i64>,

        /// Maximum accepted value, if any.
        max: Option<i64>,
    },
}

/// Validation rule for a single field of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldRule {
    /// Name of the field within the entity, as it appears inside the brackets of the form key.
    pub name: &'static str,

    /// Whether the field must be present.
    pub required: bool,

    /// Type and constraints of the field's value.
    pub kind: FieldKind,
}

impl FieldRule {
    /// Creates a rule for a field that must always be present.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, required: true, kind }
    }

    /// Creates a rule for a field that may be omitted.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, required: false, kind }
    }
}

/// Validation rules for all fields of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Schema {
    /// Name of the entity, which prefixes the keys of all of its fields in the form.
    pub entity: &'static str,

    /// Rules for the entity fields, in the order in which errors are reported.
    pub fields: &'static [FieldRule],
}

/// A form submission as received from the client, before any validation.
#[derive(Debug, Default, PartialEq)]
pub struct RawForm(Vec<(String, String)>);

impl RawForm {
    /// Creates a form from already-decoded `(key, value)` pairs.
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: Vec<(K, V)>) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn parse(body: &[u8]) -> ModelResult<Self> {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .map(RawForm)
            .map_err(|e| ModelError(format!("Invalid form: {}", e)))
    }

    /// Returns the fields nested under `entity`, or `None` if the form has none of them.
    ///
    /// When a key is repeated, the last value wins.
    fn entity_fields(&self, entity: &str) -> Option<BTreeMap<&str, &str>> {
        let mut fields = BTreeMap::default();
        for (key, value) in &self.0 {
            let name = key
                .strip_prefix(entity)
                .and_then(|rest| rest.strip_prefix('['))
                .and_then(|rest| rest.strip_suffix(']'));
            if let Some(name) = name {
                fields.insert(name, value.as_str());
            }
        }
        if fields.is_empty() { None } else { Some(fields) }
    }
}

/// A typed value that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Value of a `FieldKind::Text` field.
    Text(String),

    /// Value of a `FieldKind::Number` field.
    Number(f64),

    /// Value of a `FieldKind::Integer` field.
    Integer(i64),
}

/// The normalized fields of an entity that passed validation against its schema.
#[derive(Debug, PartialEq)]
pub struct Record {
    /// Name of the entity, used to format error messages.
    entity: &'static str,

    /// Values of the fields that were present in the form.
    values: BTreeMap<&'static str, FieldValue>,
}

impl Record {
    /// Takes the value of field `name`, returning `None` if it was optional and not present.
    fn take(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Builds the error returned when a field accessor does not match the schema.
    fn mismatch(&self, name: &str, expected: &str) -> ModelError {
        ModelError(format!("\"{}.{}\" is not a validated {}", self.entity, name, expected))
    }

    /// Takes the value of the required text field `name`.
    pub fn take_text(&mut self, name: &str) -> ModelResult<String> {
        match self.take(name) {
            Some(FieldValue::Text(s)) => Ok(s),
            _ => Err(self.mismatch(name, "text")),
        }
    }

    /// Takes the value of the required number field `name`.
    pub fn take_number(&mut self, name: &str) -> ModelResult<f64> {
        match self.take(name) {
            Some(FieldValue::Number(n)) => Ok(n),
            _ => Err(self.mismatch(name, "number")),
        }
    }

    /// Takes the value of the required integer field `name`.
    pub fn take_integer(&mut self, name: &str) -> ModelResult<i64> {
        match self.take(name) {
            Some(FieldValue::Integer(i)) => Ok(i),
            _ => Err(self.mismatch(name, "integer")),
        }
    }

    /// Takes the value of the optional text field `name`.
    pub fn take_optional_text(&mut self, name: &str) -> ModelResult<Option<String>> {
        match self.take(name) {
            None => Ok(None),
            Some(FieldValue::Text(s)) => Ok(Some(s)),
            Some(_) => Err(self.mismatch(name, "text")),
        }
    }
}

/// Outcome of validating a form.
#[derive(Debug, PartialEq)]
pub enum Validation<T> {
    /// The form was valid and produced the normalized value.
    Valid(T),

    /// The form was invalid.  Contains one message per failure, in schema order.
    Invalid(Vec<String>),
}

/// Checks a single `value` against `kind`.  `path` is the dotted name used in error messages.
fn check_field(path: &str, kind: FieldKind, value: &str) -> Result<FieldValue, String> {
    match kind {
        FieldKind::Text => {
            if value.is_empty() {
                return Err(format!("\"{}\" is not allowed to be empty", path));
            }
            Ok(FieldValue::Text(value.to_owned()))
        }

        FieldKind::Number { min, max } => {
            let n = match value.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => return Err(format!("\"{}\" must be a number", path)),
            };
            if let Some(min) = min {
                if n < min {
                    return Err(format!("\"{}\" must be greater than or equal to {}", path, min));
                }
            }
            if let Some(max) = max {
                if n > max {
                    return Err(format!("\"{}\" must be less than or equal to {}", path, max));
                }
            }
            Ok(FieldValue::Number(n))
        }

        FieldKind::Integer { min, max } => {
            let n = match value.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => return Err(format!("\"{}\" must be a number", path)),
            };
            if n.fract() != 0.0 {
                return Err(format!("\"{}\" must be an integer", path));
            }
            if let Some(min) = min {
                if n < min as f64 {
                    return Err(format!("\"{}\" must be greater than or equal to {}", path, min));
                }
            }
            if let Some(max) = max {
                if n > max as f64 {
                    return Err(format!("\"{}\" must be less than or equal to {}", path, max));
                }
            }
            if n < i64::MIN as f64 || n >= i64::MAX as f64 {
                return Err(format!("\"{}\" must be a safe number", path));
            }
            Ok(FieldValue::Integer(n as i64))
        }
    }
}

impl Schema {
    /// Validates `form` against this schema and returns the normalized record or all errors.
    pub fn validate(&self, form: &RawForm) -> Validation<Record> {
        let fields = match form.entity_fields(self.entity) {
            Some(fields) => fields,
            None => return Validation::Invalid(vec![format!("\"{}\" is required", self.entity)]),
        };

        let mut errors = vec![];
        let mut values = BTreeMap::default();
        for rule in self.fields {
            let path = format!("{}.{}", self.entity, rule.name);
            match fields.get(rule.name) {
                None if rule.required => errors.push(format!("\"{}\" is required", path)),
                None => (),
                Some(value) => match check_field(&path, rule.kind, value) {
                    Ok(value) => {
                        values.insert(rule.name, value);
                    }
                    Err(e) => errors.push(e),
                },
            }
        }

        for name in fields.keys() {
            if !self.fields.iter().any(|rule| rule.name == *name) {
                errors.push(format!("\"{}.{}\" is not allowed", self.entity, name));
            }
        }

        if errors.is_empty() {
            Validation::Valid(Record { entity: self.entity, values })
        } else {
            Validation::Invalid(errors)
        }
    }
}

/// Types that can be built from a form validated against a fixed schema.
pub trait Validate: Sized {
    /// The schema that forms must satisfy to build this type.
    const SCHEMA: Schema;

    /// Builds the type from a `record` that already passed validation against `SCHEMA`.
    fn from_record(record: Record) -> ModelResult<Self>;
}

/// Validates `form` against the schema of `T` and builds a `T` out of it.
pub fn validate<T: Validate>(form: &RawForm) -> Validation<T> {
    match T::SCHEMA.validate(form) {
        Validation::Valid(record) => match T::from_record(record) {
            Ok(value) => Validation::Valid(value),
            Err(e) => Validation::Invalid(vec![e.to_string()]),
        },
        Validation::Invalid(errors) => Validation::Invalid(errors),
    }
}
