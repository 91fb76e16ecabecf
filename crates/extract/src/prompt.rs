use memorie_core::{
    EstateField, ExtractionMode, FieldAliases, FieldKind, ItemKind, ITEM_NAME_KEY, ITEM_VALUE_KEY,
};
use serde_json::{json, Map, Value};

/// Instruction used when the response schema carries the structure.
pub const SCHEMA_PROMPT: &str = "Transcribe the information present in the images to json.";

/// What is sent alongside the images.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub text: String,
    /// Present only in schema mode.
    pub response_schema: Option<Value>,
}

impl Instruction {
    /// Build the instruction for `mode`. A custom prompt replaces the built-in
    /// text but never removes the schema.
    pub fn for_mode(
        mode: ExtractionMode,
        aliases: &FieldAliases,
        custom_prompt: Option<&str>,
    ) -> Self {
        match mode {
            ExtractionMode::Schema => Self {
                text: custom_prompt.unwrap_or(SCHEMA_PROMPT).to_string(),
                response_schema: Some(response_schema(aliases)),
            },
            ExtractionMode::Freeform => Self {
                text: custom_prompt
                    .map(str::to_string)
                    .unwrap_or_else(|| freeform_prompt(aliases)),
                response_schema: None,
            },
        }
    }
}

/// Legacy prompt that spells out the JSON template to reproduce.
pub fn freeform_prompt(aliases: &FieldAliases) -> String {
    let mut template = Map::new();
    for (field, key) in aliases.metadata_keys() {
        let placeholder = match field.kind() {
            FieldKind::Text => json!("<name of the deceased>"),
            FieldKind::Date => json!("<YYYY-MM-DD>"),
            FieldKind::Number => json!(0.0),
        };
        template.insert(key.to_string(), placeholder);
    }
    let item = json!({ ITEM_NAME_KEY: "<description>", ITEM_VALUE_KEY: 0.0 });
    let mut overview = Map::new();
    for kind in ItemKind::ALL {
        overview.insert(aliases.list_key(kind).to_string(), json!([item.clone()]));
    }
    template.insert(aliases.overview.clone(), Value::Object(overview));

    let rendered = serde_json::to_string_pretty(&Value::Object(template)).unwrap_or_default();
    format!(
        "Transcribe the information present in the images to json. \
         Reply with a single JSON object using exactly these keys and this structure:\n\
         {rendered}\n\
         List every asset and every liability as a separate entry. \
         All amounts must be plain numbers without currency symbols or thousands separators."
    )
}

/// Response schema in the service's OpenAPI subset: five required metadata
/// fields and an overview with two required lists of `{name, value}`.
pub fn response_schema(aliases: &FieldAliases) -> Value {
    let item = json!({
        "type": "OBJECT",
        "properties": {
            ITEM_NAME_KEY: { "type": "STRING" },
            ITEM_VALUE_KEY: { "type": "NUMBER" }
        },
        "required": [ITEM_NAME_KEY, ITEM_VALUE_KEY],
        "propertyOrdering": [ITEM_NAME_KEY, ITEM_VALUE_KEY]
    });

    let list_keys: Vec<&str> = ItemKind::ALL.iter().map(|k| aliases.list_key(*k)).collect();
    let mut list_props = Map::new();
    for key in &list_keys {
        list_props.insert(key.to_string(), json!({ "type": "ARRAY", "items": item.clone() }));
    }

    let mut props = Map::new();
    for (field, key) in aliases.metadata_keys() {
        props.insert(key.to_string(), field_schema(field));
    }
    props.insert(
        aliases.overview.clone(),
        json!({
            "type": "OBJECT",
            "properties": list_props,
            "required": list_keys,
            "propertyOrdering": list_keys
        }),
    );

    let mut top_keys: Vec<&str> = aliases.metadata_keys().map(|(_, k)| k).collect();
    top_keys.push(&aliases.overview);

    json!({
        "type": "OBJECT",
        "properties": props,
        "required": top_keys,
        "propertyOrdering": top_keys
    })
}

fn field_schema(field: EstateField) -> Value {
    match field.kind() {
        FieldKind::Text => json!({ "type": "STRING" }),
        FieldKind::Date => json!({ "type": "STRING", "format": "date-time" }),
        FieldKind::Number => json!({ "type": "NUMBER" }),
    }
}
