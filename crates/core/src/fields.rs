use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Sentinel written for text fields the transcription left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column carrying the Asset/Liability discriminator.
pub const TYPE_COLUMN: &str = "Type";
pub const ITEM_NAME_KEY: &str = "name";
pub const ITEM_DESCRIPTION_KEY: &str = "description";
pub const ITEM_VALUE_KEY: &str = "value";

/// The five top-level metadata fields of an estate inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstateField {
    Name,
    DateOfDeath,
    NetAssets,
    NetLiabilities,
    NetWealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Free-form date text; never parsed as a calendar date.
    Date,
    Number,
}

impl EstateField {
    /// Output column order for the metadata block.
    pub const ALL: [EstateField; 5] = [
        EstateField::Name,
        EstateField::DateOfDeath,
        EstateField::NetAssets,
        EstateField::NetLiabilities,
        EstateField::NetWealth,
    ];

    pub fn canonical_name(self) -> &'static str {
        match self {
            EstateField::Name => "name",
            EstateField::DateOfDeath => "date_of_death",
            EstateField::NetAssets => "net_assets",
            EstateField::NetLiabilities => "net_liabilities",
            EstateField::NetWealth => "net_wealth",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            EstateField::Name => FieldKind::Text,
            EstateField::DateOfDeath => FieldKind::Date,
            EstateField::NetAssets | EstateField::NetLiabilities | EstateField::NetWealth => {
                FieldKind::Number
            }
        }
    }

    /// The value substituted when the field is absent or `null`.
    pub fn default_value(self) -> Value {
        match self.kind() {
            FieldKind::Text | FieldKind::Date => Value::String(NOT_AVAILABLE.to_string()),
            FieldKind::Number => Value::from(0),
        }
    }

    /// Look the field up under its display key. `null` counts as absent.
    pub fn lookup<'a>(
        self,
        obj: &'a Map<String, Value>,
        aliases: &FieldAliases,
    ) -> Option<&'a Value> {
        obj.get(aliases.key(self)).filter(|v| !v.is_null())
    }
}

impl fmt::Display for EstateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Asset,
    Liability,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Asset, ItemKind::Liability];
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Asset => write!(f, "Asset"),
            ItemKind::Liability => write!(f, "Liability"),
        }
    }
}

/// Canonical field → external display key.
///
/// The display keys are the literal JSON keys the transcription uses and the
/// literal CSV column names; they are passed through, never translated.
/// Missing entries in a settings file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldAliases {
    pub name: String,
    pub date_of_death: String,
    pub net_assets: String,
    pub net_liabilities: String,
    pub net_wealth: String,
    pub overview: String,
    pub assets: String,
    pub liabilities: String,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            date_of_death: "Date of Death".to_string(),
            net_assets: "Baten (Net Assets)".to_string(),
            net_liabilities: "Schulden en Lasten (Net Liabilities)".to_string(),
            net_wealth: "Saldo (Net Wealth)".to_string(),
            overview: "Overview".to_string(),
            assets: "Assets".to_string(),
            liabilities: "Liabilities".to_string(),
        }
    }
}

impl FieldAliases {
    pub fn key(&self, field: EstateField) -> &str {
        match field {
            EstateField::Name => &self.name,
            EstateField::DateOfDeath => &self.date_of_death,
            EstateField::NetAssets => &self.net_assets,
            EstateField::NetLiabilities => &self.net_liabilities,
            EstateField::NetWealth => &self.net_wealth,
        }
    }

    pub fn list_key(&self, kind: ItemKind) -> &str {
        match kind {
            ItemKind::Asset => &self.assets,
            ItemKind::Liability => &self.liabilities,
        }
    }

    /// Metadata display keys in output column order.
    pub fn metadata_keys(&self) -> impl Iterator<Item = (EstateField, &str)> + '_ {
        EstateField::ALL.into_iter().map(move |f| (f, self.key(f)))
    }
}
