pub mod fields;
pub mod output;
pub mod record;
pub mod settings;

pub use fields::{
    EstateField, FieldAliases, FieldKind, ItemKind, ITEM_DESCRIPTION_KEY, ITEM_NAME_KEY,
    ITEM_VALUE_KEY, NOT_AVAILABLE, TYPE_COLUMN,
};
pub use output::write_atomic;
pub use record::{EstateRecord, Item, RecordWarning};
pub use settings::{
    ExtractSettings, ExtractionMode, Settings, SettingsError, DEFAULT_SETTINGS_FILE,
};
