use serde_json::{Map, Value};
use std::fmt;

use crate::fields::{EstateField, FieldAliases, ItemKind};

/// One financial line item, kept as the raw JSON object so that keys the
/// transcription added beyond `name`/`value` survive as extra columns.
pub type Item = Map<String, Value>;

/// Non-fatal findings while reading a transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordWarning {
    /// A metadata field was absent or null and its default was used.
    MissingField(String),
    /// An item list contained something other than a JSON object.
    NonRecordItem { kind: ItemKind, index: usize },
    /// Neither list had any items.
    EmptyOverview,
    /// No item in a non-empty list carried a `name` key.
    MissingNameKey(ItemKind),
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordWarning::MissingField(key) => write!(f, "field '{key}' missing, using default"),
            RecordWarning::NonRecordItem { kind, index } => {
                write!(f, "{kind} entry {index} is not an object, skipped")
            }
            RecordWarning::EmptyOverview => write!(f, "no assets or liabilities found"),
            RecordWarning::MissingNameKey(kind) => {
                write!(f, "{kind} items have no 'name' key, columns left unchanged")
            }
        }
    }
}

/// A parsed estate inventory with every metadata field resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EstateRecord {
    /// Metadata in [`EstateField::ALL`] order.
    pub metadata: Vec<(EstateField, Value)>,
    pub assets: Vec<Item>,
    pub liabilities: Vec<Item>,
}

impl EstateRecord {
    /// Read a transcription object, defaulting whatever is missing.
    pub fn from_object(
        obj: &Map<String, Value>,
        aliases: &FieldAliases,
    ) -> (Self, Vec<RecordWarning>) {
        let mut warnings = Vec::new();

        let metadata = EstateField::ALL
            .into_iter()
            .map(|field| {
                let value = match field.lookup(obj, aliases) {
                    Some(v) => v.clone(),
                    None => {
                        warnings.push(RecordWarning::MissingField(aliases.key(field).to_string()));
                        field.default_value()
                    }
                };
                (field, value)
            })
            .collect();

        let overview = obj.get(&aliases.overview).and_then(Value::as_object);
        let assets = read_items(overview, aliases, ItemKind::Asset, &mut warnings);
        let liabilities = read_items(overview, aliases, ItemKind::Liability, &mut warnings);

        if assets.is_empty() && liabilities.is_empty() {
            warnings.push(RecordWarning::EmptyOverview);
        }

        (Self { metadata, assets, liabilities }, warnings)
    }

    pub fn items(&self, kind: ItemKind) -> &[Item] {
        match kind {
            ItemKind::Asset => &self.assets,
            ItemKind::Liability => &self.liabilities,
        }
    }

    pub fn item_count(&self) -> usize {
        self.assets.len() + self.liabilities.len()
    }

    pub fn metadata_value(&self, field: EstateField) -> Option<&Value> {
        self.metadata.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }
}

fn read_items(
    overview: Option<&Map<String, Value>>,
    aliases: &FieldAliases,
    kind: ItemKind,
    warnings: &mut Vec<RecordWarning>,
) -> Vec<Item> {
    let Some(entries) = overview
        .and_then(|o| o.get(aliases.list_key(kind)))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry.as_object() {
            Some(item) => Some(item.clone()),
            None => {
                warnings.push(RecordWarning::NonRecordItem { kind, index });
                None
            }
        })
        .collect()
}
