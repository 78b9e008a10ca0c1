use crate::field::EntityField;
use crate::loader::json_loader::EntityInstanceJson;

/// A placed entity instance.
///
/// Entities are plain values after load; layers hand them out behind `Rc`
/// and clones of a layer share them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    /// Entity type name. Not unique across instances.
    pub id: String,
    /// Unique instance id.
    pub iid: String,
    /// Pixel position inside the layer.
    pub x: i32,
    /// See `x`.
    pub y: i32,
    /// Grid position inside the layer.
    pub grid: (i32, i32),
    /// Normalized pivot in `[0, 1]`.
    pub pivot_x: f32,
    /// See `pivot_x`.
    pub pivot_y: f32,
    /// Size in pixels.
    pub width: i32,
    /// See `width`.
    pub height: i32,
    /// Tags from the entity definition.
    pub tags: Vec<String>,
    /// Custom fields in definition order.
    pub fields: Vec<EntityField>,
}

impl Entity {
    /// Builds an entity from its exported record.
    pub fn from_json(json: &EntityInstanceJson) -> Self {
        Entity {
            id: json.identifier.clone(),
            iid: json.iid.clone(),
            x: json.px[0],
            y: json.px[1],
            grid: (json.grid[0], json.grid[1]),
            pivot_x: json.pivot[0],
            pivot_y: json.pivot[1],
            width: json.width,
            height: json.height,
            tags: json.tags.clone(),
            fields: json.field_instances.iter().map(EntityField::from_json).collect(),
        }
    }

    /// First field called `name`.
    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.id() == name)
    }

    /// Top-left corner in pixels, with the pivot applied.
    pub fn top_left(&self) -> (f32, f32) {
        (
            self.x as f32 - self.pivot_x * self.width as f32,
            self.y as f32 - self.pivot_y * self.height as f32,
        )
    }
}
