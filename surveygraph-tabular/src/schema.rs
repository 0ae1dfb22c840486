//! Table schema descriptors.
//!
//! A template ships its fixed schema as a JSON descriptor (field list,
//! constraints, primary and foreign keys). When a file is read, the fixed
//! schema is merged with the file's header: columns the template does not
//! know become opaque `extra` string fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabularError};

/// Cell types a field can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    Datetime,
    /// Precision-aware timestamp: year, year-month, date or datetime.
    Timestamp,
    /// Sequence of strings separated by `|`.
    List,
}

impl FieldType {
    /// Name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Timestamp => "timestamp",
            FieldType::List => "list",
        }
    }
}

/// Per-field constraints checked by the baseline validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

/// Field definition for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub constraints: Constraints,
    /// Set on columns added by a file beyond the template schema.
    #[serde(skip)]
    pub extra: bool,
}

impl Field {
    /// A plain optional string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// A field of the given type with no constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
            constraints: Constraints::default(),
            extra: false,
        }
    }

    /// An opaque text column not described by the template.
    pub fn extra(name: impl Into<String>) -> Self {
        Self {
            extra: true,
            ..Self::string(name)
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.constraints.required = true;
        self
    }

    /// Mark the field as unique.
    pub fn unique(mut self) -> Self {
        self.constraints.unique = true;
        self
    }

    /// Restrict the field to a set of values.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyReference {
    /// Referenced resource; empty means self-reference.
    #[serde(default)]
    pub resource: String,
    pub fields: Vec<String>,
}

/// Foreign key declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub fields: Vec<String>,
    pub reference: ForeignKeyReference,
}

#[derive(Deserialize)]
struct SchemaDescriptor {
    fields: Vec<Field>,
    #[serde(rename = "primaryKey", default)]
    primary_key: Vec<String>,
    #[serde(rename = "foreignKeys", default)]
    foreign_keys: Vec<ForeignKey>,
    #[serde(rename = "missingValues", default = "default_missing_values")]
    missing_values: Vec<String>,
}

fn default_missing_values() -> Vec<String> {
    vec![String::new()]
}

/// Schema for a table: ordered fields plus key declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SchemaDescriptor")]
pub struct Schema {
    pub fields: Vec<Field>,
    #[serde(rename = "primaryKey")]
    pub primary_key: Vec<String>,
    #[serde(rename = "foreignKeys")]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(rename = "missingValues")]
    pub missing_values: Vec<String>,
    #[serde(skip)]
    name_to_index: HashMap<String, usize>,
}

impl From<SchemaDescriptor> for Schema {
    fn from(d: SchemaDescriptor) -> Self {
        let mut schema = Schema::new(d.fields);
        schema.primary_key = d.primary_key;
        schema.foreign_keys = d.foreign_keys;
        schema.missing_values = d.missing_values;
        schema
    }
}

impl Schema {
    /// Create a schema from field definitions, with no keys.
    pub fn new(fields: Vec<Field>) -> Self {
        let name_to_index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self {
            fields,
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            missing_values: default_missing_values(),
            name_to_index,
        }
    }

    /// Parse a JSON schema descriptor.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json)?;
        if schema.name_to_index.len() != schema.fields.len() {
            return Err(TabularError::Schema(
                "schema descriptor declares a field name more than once".to_string(),
            ));
        }
        Ok(schema)
    }

    /// Set the primary key.
    pub fn with_primary_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a foreign key.
    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Index of a field by name.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    /// Whether a field with this name exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Field names in column order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields added beyond the template schema.
    pub fn extra_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|f| f.extra)
    }

    /// Whether a raw cell counts as missing.
    pub fn is_missing(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty() || self.missing_values.iter().any(|m| m == trimmed)
    }

    /// Merge this (template) schema with a file header.
    ///
    /// Columns named like a template field take the template definition,
    /// anything else becomes an `extra` string field. Column order follows
    /// the header; keys are carried over unchanged so that the extension
    /// rules can check them against the template.
    pub fn merge_header(&self, header: &[String]) -> Schema {
        let fields = header
            .iter()
            .map(|name| match self.field(name) {
                Some(f) => f.clone(),
                None => Field::extra(name.clone()),
            })
            .collect();
        let mut merged = Schema::new(fields);
        merged.primary_key = self.primary_key.clone();
        merged.foreign_keys = self.foreign_keys.clone();
        merged.missing_values = self.missing_values.clone();
        merged
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
            && self.primary_key == other.primary_key
            && self.foreign_keys == other.foreign_keys
            && self.missing_values == other.missing_values
    }
}
