use crate::loader::json_loader::{
    EntityReferenceInfos, FieldInstanceJson, GridPoint, TilesetRect,
};
use serde_json::Value as JsonValue;

/// One custom field of an entity or level.
///
/// The value is kept exactly as exported; call [`EntityField::resolve`]
/// to get a typed view of it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityField {
    id: String,
    value: JsonValue,
    field_type: String,
    def_uid: i64,
}

impl EntityField {
    /// Creates a field from its parts.
    pub fn new(id: impl Into<String>, value: JsonValue, field_type: impl Into<String>, def_uid: i64) -> Self {
        EntityField {
            id: id.into(),
            value,
            field_type: field_type.into(),
            def_uid,
        }
    }

    pub(crate) fn from_json(field: &FieldInstanceJson) -> Self {
        EntityField::new(
            field.identifier.clone(),
            field.value.clone(),
            field.field_type.clone(),
            field.def_uid,
        )
    }

    /// Field name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw exported value.
    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    /// Type tag, e.g. `Int` or `Array<Point>`.
    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    /// Uid of the field definition.
    pub fn def_uid(&self) -> i64 {
        self.def_uid
    }

    /// Interprets the raw value according to the type tag.
    pub fn resolve(&self) -> FieldValue {
        FieldValue::from_tagged(&self.field_type, &self.value)
    }
}

/// Typed view of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Unset optional field.
    Null,
    /// `Int`.
    Int(i64),
    /// `Float`.
    Float(f64),
    /// `Bool`.
    Bool(bool),
    /// `String`, `Multilines`, `Text` and `FilePath`.
    String(String),
    /// `Color` as `#rrggbb`.
    Color(String),
    /// A value of a local or external enum.
    Enum {
        /// Name of the enum type.
        enum_name: String,
        /// Selected value.
        value: String,
    },
    /// `Point`.
    Point(GridPoint),
    /// `Tile`.
    Tile(TilesetRect),
    /// `EntityRef`.
    EntityRef(EntityReferenceInfos),
    /// `Array<...>` of any of the above.
    Array(Vec<FieldValue>),
    /// A value whose shape did not match its tag, or an unknown tag.
    Other(JsonValue),
}

impl FieldValue {
    /// Resolves `value` using the LDtk type tag `field_type`.
    pub fn from_tagged(field_type: &str, value: &JsonValue) -> FieldValue {
        if let Some(inner) = field_type
            .strip_prefix("Array<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return match value {
                JsonValue::Array(items) => FieldValue::Array(
                    items
                        .iter()
                        .map(|item| FieldValue::from_tagged(inner, item))
                        .collect(),
                ),
                JsonValue::Null => FieldValue::Null,
                other => FieldValue::Other(other.clone()),
            };
        }

        if value.is_null() {
            return FieldValue::Null;
        }

        let parsed = match field_type {
            "Int" => value.as_i64().map(FieldValue::Int),
            "Float" => value.as_f64().map(FieldValue::Float),
            "Bool" => value.as_bool().map(FieldValue::Bool),
            "String" | "Multilines" | "Text" | "FilePath" => {
                value.as_str().map(|s| FieldValue::String(s.to_owned()))
            }
            "Color" => value.as_str().map(|s| FieldValue::Color(s.to_owned())),
            "Point" => serde_json::from_value(value.clone()).ok().map(FieldValue::Point),
            "Tile" => serde_json::from_value(value.clone()).ok().map(FieldValue::Tile),
            "EntityRef" => serde_json::from_value(value.clone())
                .ok()
                .map(FieldValue::EntityRef),
            other => enum_name(other).and_then(|enum_name| {
                value.as_str().map(|s| FieldValue::Enum {
                    enum_name: enum_name.to_owned(),
                    value: s.to_owned(),
                })
            }),
        };

        parsed.unwrap_or_else(|| FieldValue::Other(value.clone()))
    }
}

// `LocalEnum.Name`, `ExternEnum.Name` and the older `Enum(Name)`.
fn enum_name(field_type: &str) -> Option<&str> {
    field_type
        .strip_prefix("LocalEnum.")
        .or_else(|| field_type.strip_prefix("ExternEnum."))
        .or_else(|| {
            field_type
                .strip_prefix("Enum(")
                .and_then(|rest| rest.strip_suffix(')'))
        })
}
