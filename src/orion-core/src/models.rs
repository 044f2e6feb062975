use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ModelError;

/// Attribute is a named, typed value attached to an entity
///
/// The value is carried opaquely: any JSON scalar, array or object is accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub attr_type: String,
    #[serde(default)]
    pub value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attr_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            attr_type: attr_type.into(),
            value: value.into(),
        }
    }

    /// JSON form sent to the broker: exactly `name`, `type` and `value`
    pub fn to_representation(&self) -> Value {
        let mut repr = Map::with_capacity(3);
        repr.insert("name".to_string(), Value::String(self.name.clone()));
        repr.insert("type".to_string(), Value::String(self.attr_type.clone()));
        repr.insert("value".to_string(), self.value.clone());
        Value::Object(repr)
    }
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_representation().serialize(serializer)
    }
}

/// Entity is a context element: an id, a type and an ordered set of attributes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(rename = "isPattern", default, deserialize_with = "deserialize_pattern_flag")]
    pub is_pattern: bool,
    #[serde(default)]
    attributes: Vec<Attribute>,
}

impl Entity {
    /// Entity matched literally by id and type
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            is_pattern: false,
            attributes: Vec::new(),
        }
    }

    /// Entity whose id is a pattern (regular expression) on the broker side
    pub fn pattern(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            is_pattern: true,
            ..Self::new(id, entity_type)
        }
    }

    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.add_attributes(attributes);
        self
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Append attributes in the given order. Duplicates are kept.
    pub fn add_attributes(&mut self, attributes: impl IntoIterator<Item = Attribute>) {
        self.attributes.extend(attributes);
    }

    /// Remove the first structurally equal attribute for each one given.
    ///
    /// Either every requested attribute is removed or none is: on a miss the
    /// sequence is left untouched and `AttributeNotFound` is returned.
    pub fn del_attributes(&mut self, attributes: &[Attribute]) -> Result<(), ModelError> {
        let mut remaining = self.attributes.clone();

        for attribute in attributes {
            let position = remaining
                .iter()
                .position(|candidate| candidate == attribute)
                .ok_or_else(|| ModelError::AttributeNotFound {
                    entity_id: self.id.clone(),
                    name: attribute.name.clone(),
                })?;
            remaining.remove(position);
        }

        self.attributes = remaining;
        Ok(())
    }

    /// JSON form sent to the broker.
    ///
    /// `isPattern` is a string on the wire, and `attributes` is left out
    /// entirely when the entity has none.
    pub fn to_representation(&self) -> Value {
        let mut repr = Map::with_capacity(4);
        repr.insert("id".to_string(), Value::String(self.id.clone()));
        repr.insert("type".to_string(), Value::String(self.entity_type.clone()));
        repr.insert(
            "isPattern".to_string(),
            Value::String(self.is_pattern.to_string()),
        );

        if !self.attributes.is_empty() {
            let attributes = self
                .attributes
                .iter()
                .map(Attribute::to_representation)
                .collect();
            repr.insert("attributes".to_string(), Value::Array(attributes));
        }

        Value::Object(repr)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_representation().serialize(serializer)
    }
}

/// Brokers echo `isPattern` as a string, but accept a plain boolean too
fn deserialize_pattern_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PatternFlag {
        Bool(bool),
        Text(String),
    }

    match PatternFlag::deserialize(deserializer)? {
        PatternFlag::Bool(flag) => Ok(flag),
        PatternFlag::Text(text) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!("invalid isPattern value: {other}"))),
        },
    }
}
