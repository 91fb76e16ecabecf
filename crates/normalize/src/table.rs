use memorie_core::{
    EstateRecord, FieldAliases, Item, ItemKind, RecordWarning, ITEM_DESCRIPTION_KEY,
    ITEM_NAME_KEY, TYPE_COLUMN,
};
use serde_json::Value;
use std::collections::HashSet;

/// Row-oriented output: one JSON object per row plus the column union.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Every key seen across the rows, in first-seen order.
    pub columns: Vec<String>,
    pub rows: Vec<Item>,
}

impl Table {
    pub fn from_rows(rows: Vec<Item>) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for key in rows.iter().flat_map(|row| row.keys()) {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text for every column of one row; absent cells are empty.
    pub fn cells(&self, row: usize) -> Vec<String> {
        let row = &self.rows[row];
        self.columns
            .iter()
            .map(|c| row.get(c).map(render_cell).unwrap_or_default())
            .collect()
    }
}

/// Strings verbatim, numbers in JSON form, null as empty, nested values as compact JSON.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// Flatten an estate record into rows: assets then liabilities, each tagged
/// with its `Type`, metadata broadcast onto every row. With no items at all
/// the table is a single metadata-only row.
pub fn flatten(record: &EstateRecord, aliases: &FieldAliases) -> (Table, Vec<RecordWarning>) {
    let mut warnings = Vec::new();
    let mut rows: Vec<Item> = Vec::with_capacity(record.item_count().max(1));

    for kind in ItemKind::ALL {
        let items = record.items(kind);
        if items.is_empty() {
            continue;
        }
        if !items.iter().any(|item| item.contains_key(ITEM_NAME_KEY)) {
            warnings.push(RecordWarning::MissingNameKey(kind));
        }
        rows.extend(items.iter().cloned().map(|item| {
            let mut row = rename_name_key(item);
            row.insert(TYPE_COLUMN.to_string(), Value::String(kind.to_string()));
            row
        }));
    }

    if rows.is_empty() {
        rows.push(Item::new());
    }

    // Item columns first, metadata columns after them.
    let mut table = Table::from_rows(rows);
    for (field, value) in &record.metadata {
        let key = aliases.key(*field);
        if !table.columns.iter().any(|c| c == key) {
            table.columns.push(key.to_string());
        }
        for row in &mut table.rows {
            row.insert(key.to_string(), value.clone());
        }
    }

    (table, warnings)
}

/// `name` becomes `description` at the same column position. Items without
/// `name` are returned untouched.
fn rename_name_key(item: Item) -> Item {
    if !item.contains_key(ITEM_NAME_KEY) {
        return item;
    }
    item.into_iter()
        .filter(|(k, _)| k != ITEM_DESCRIPTION_KEY)
        .map(|(k, v)| {
            if k == ITEM_NAME_KEY {
                (ITEM_DESCRIPTION_KEY.to_string(), v)
            } else {
                (k, v)
            }
        })
        .collect()
}
