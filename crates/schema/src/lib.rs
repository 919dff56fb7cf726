use ahash::RandomState;
use common::{FieldId, FilterError, FilterResult};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use types::LogicalType;

type Map<K, V> = HashMap<K, V, RandomState>;

/// A named, typed field of the logical table schema.
///
/// The id is the sole stable identity; the name is display-oriented and
/// used only to resolve references at bind time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub required: bool,
    pub logical_type: LogicalType,
}

impl Field {
    pub fn required(id: FieldId, name: &str, logical_type: LogicalType) -> Self {
        Self {
            id,
            name: name.to_string(),
            required: true,
            logical_type,
        }
    }

    pub fn optional(id: FieldId, name: &str, logical_type: LogicalType) -> Self {
        Self {
            id,
            name: name.to_string(),
            required: false,
            logical_type,
        }
    }
}

/// Ordered logical schema with by-name and by-id lookup.
#[derive(Clone, Debug, Serialize)]
pub struct Schema {
    fields: Vec<Field>,
    #[serde(skip)]
    name_index: Map<String, usize>,
    #[serde(skip)]
    id_index: Map<FieldId, usize>,
}

impl Schema {
    /// Build a schema, rejecting duplicate field ids or names.
    pub fn try_new(fields: Vec<Field>) -> FilterResult<Self> {
        let mut schema = Self {
            fields,
            name_index: Map::default(),
            id_index: Map::default(),
        };
        schema.rebuild_indexes()?;
        Ok(schema)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.name_index.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn field_by_id(&self, id: FieldId) -> Option<&Field> {
        self.id_index.get(&id).map(|&idx| &self.fields[idx])
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn rebuild_indexes(&mut self) -> FilterResult<()> {
        self.name_index.clear();
        self.id_index.clear();
        for (idx, field) in self.fields.iter().enumerate() {
            if self.name_index.insert(field.name.clone(), idx).is_some() {
                return Err(FilterError::InvalidSchema(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            if self.id_index.insert(field.id, idx).is_some() {
                return Err(FilterError::InvalidSchema(format!(
                    "duplicate field id {}",
                    field.id
                )));
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            fields: Vec<Field>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Schema::try_new(raw.fields).map_err(serde::de::Error::custom)
    }
}
