//! Legacy item definitions and override classification.
//!
//! A legacy definition lives in models/item/*.json and selects alternate
//! models through an `overrides` list. Each override carries a predicate map
//! (`custom_model_data`, `damage`, `pulling`, `pull`, `charged`, `firework`)
//! and the model to use when the predicate matches.

use crate::item_model::{DispatchProperty, Threshold};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

pub const PREDICATE_CUSTOM_MODEL_DATA: &str = "custom_model_data";
pub const PREDICATE_DAMAGE: &str = "damage";
pub const PREDICATE_PULLING: &str = "pulling";
pub const PREDICATE_PULL: &str = "pull";
pub const PREDICATE_CHARGED: &str = "charged";
pub const PREDICATE_FIREWORK: &str = "firework";

/// Item ids that render with a dye tint.
pub const LEATHER_ITEMS: [&str; 4] = [
    "minecraft:item/leather_boots",
    "minecraft:item/leather_leggings",
    "minecraft:item/leather_chestplate",
    "minecraft:item/leather_helmet",
];

/// A parsed legacy item model from models/item/*.json.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyItemDefinition {
    /// Texture variables; `layer0` is the item's base texture.
    #[serde(default)]
    pub textures: Map<String, Value>,

    /// Conditional model overrides, in file order.
    #[serde(default)]
    pub overrides: Option<Vec<Override>>,

    /// Display transforms, passed through unchanged.
    #[serde(default)]
    pub display: Option<Value>,
}

/// One entry of the legacy `overrides` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Override {
    #[serde(default)]
    pub predicate: Map<String, Value>,
    #[serde(default)]
    pub model: Option<String>,
}

impl Override {
    pub fn new(predicate: Value, model: &str) -> Self {
        Self {
            predicate: predicate.as_object().cloned().unwrap_or_default(),
            model: Some(model.to_string()),
        }
    }

    /// The target model, if present and non-empty.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }

    pub fn has(&self, key: &str) -> bool {
        self.predicate.contains_key(key)
    }

    /// `custom_model_data` as an integer.
    pub fn custom_model_data(&self) -> Option<i64> {
        self.predicate
            .get(PREDICATE_CUSTOM_MODEL_DATA)
            .and_then(as_integer)
    }

    /// `pull`, defaulting to 0.0.
    pub fn pull(&self) -> f64 {
        self.predicate
            .get(PREDICATE_PULL)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn is_firework(&self) -> bool {
        self.predicate
            .get(PREDICATE_FIREWORK)
            .map(is_truthy)
            .unwrap_or(false)
    }
}

impl LegacyItemDefinition {
    /// The raw `layer0` texture, if set.
    pub fn base_texture(&self) -> Option<&str> {
        self.textures
            .get("layer0")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }

    /// The base texture as a namespaced item reference.
    pub fn normalized_base_texture(&self) -> Option<String> {
        self.base_texture().map(normalize_base_texture)
    }

    /// Whether any override is keyed on custom model data or damage.
    pub fn is_convertible(&self) -> bool {
        self.overrides.as_deref().unwrap_or_default().iter().any(|o| {
            o.has(PREDICATE_CUSTOM_MODEL_DATA) || o.has(PREDICATE_DAMAGE)
        })
    }
}

/// Canonicalize a `layer0` texture.
///
/// `item/crossbow_standby` becomes `item/crossbow`, and a reference without
/// a namespace becomes `minecraft:item/<name>` with every `item/` segment
/// removed from the name.
pub fn normalize_base_texture(texture: &str) -> String {
    let texture = match texture {
        "item/crossbow_standby" => "item/crossbow",
        "minecraft:item/crossbow_standby" => "minecraft:item/crossbow",
        other => other,
    };
    if texture.contains(':') {
        texture.to_string()
    } else {
        format!("minecraft:item/{}", texture.replace("item/", ""))
    }
}

pub fn is_leather_item(normalized_texture: &str) -> bool {
    LEATHER_ITEMS.contains(&normalized_texture)
}

/// Which override layout an item uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemArchetype {
    /// Overrides map directly to models.
    Plain,
    /// Pulling states per custom model data value.
    Bow,
    /// Pulling states plus charged arrow/firework states.
    Crossbow,
}

impl ItemArchetype {
    pub fn from_texture(normalized_texture: &str) -> Self {
        if normalized_texture.contains("crossbow") {
            ItemArchetype::Crossbow
        } else if normalized_texture.contains("bow") {
            ItemArchetype::Bow
        } else {
            ItemArchetype::Plain
        }
    }
}

/// A plain override ready to become a dispatch entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainEntry {
    pub threshold: Threshold,
    pub model: String,
}

/// Result of classifying a plain item's overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainOverrides {
    pub property: DispatchProperty,
    pub entries: Vec<PlainEntry>,
}

/// Classify overrides for a [`ItemArchetype::Plain`] item.
///
/// `custom_model_data` wins when both keys are present. Any `damage`
/// override switches the whole dispatch to the damage property, even if
/// other entries were keyed on custom model data.
pub fn classify_plain(overrides: &[Override]) -> PlainOverrides {
    let mut property = DispatchProperty::CustomModelData;
    let mut entries = Vec::new();

    for o in overrides {
        let Some(model) = o.model() else {
            continue;
        };

        let threshold = if o.has(PREDICATE_CUSTOM_MODEL_DATA) {
            match o.custom_model_data() {
                Some(cmd) => Threshold::Integer(cmd),
                None => {
                    warn!("Ignoring non-numeric custom_model_data for {}", model);
                    continue;
                }
            }
        } else if let Some(damage) = o.predicate.get(PREDICATE_DAMAGE) {
            property = DispatchProperty::Damage;
            Threshold::Literal(damage.clone())
        } else {
            continue;
        };

        entries.push(PlainEntry {
            threshold,
            model: model.to_string(),
        });
    }

    PlainOverrides { property, entries }
}

/// One pulling stage of a bow or crossbow.
#[derive(Debug, Clone, PartialEq)]
pub struct PullingState {
    pub pull: f64,
    pub model: String,
}

/// Overrides sharing one custom model data value on a bow or crossbow.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideGroup {
    pub custom_model_data: i64,
    pub base: Option<String>,
    pub pulling_states: Vec<PullingState>,
    pub arrow: Option<String>,
    pub firework: Option<String>,
}

impl OverrideGroup {
    pub fn new(custom_model_data: i64) -> Self {
        Self {
            custom_model_data,
            base: None,
            pulling_states: Vec::new(),
            arrow: None,
            firework: None,
        }
    }
}

/// Group bow/crossbow overrides by custom model data value.
///
/// Groups come out in order of first appearance. Overrides without custom
/// model data are dropped. A later base, arrow or firework override for the
/// same value replaces the earlier one.
///
/// Values are truncated before grouping, so `1` and `1.5` share a group.
pub fn group_overrides(overrides: &[Override], archetype: ItemArchetype) -> Vec<OverrideGroup> {
    let mut groups: Vec<OverrideGroup> = Vec::new();

    for o in overrides {
        let (Some(model), Some(cmd)) = (o.model(), o.custom_model_data()) else {
            continue;
        };

        let index = match groups.iter().position(|g| g.custom_model_data == cmd) {
            Some(index) => index,
            None => {
                groups.push(OverrideGroup::new(cmd));
                groups.len() - 1
            }
        };
        let group = &mut groups[index];

        if o.has(PREDICATE_PULLING) {
            group.pulling_states.push(PullingState {
                pull: o.pull(),
                model: model.to_string(),
            });
        } else if archetype == ItemArchetype::Crossbow && o.has(PREDICATE_CHARGED) {
            if o.is_firework() {
                group.firework = Some(model.to_string());
            } else {
                group.arrow = Some(model.to_string());
            }
        } else {
            group.base = Some(model.to_string());
        }
    }

    groups
}

/// Integer view of a predicate value; floats truncate, numeric strings parse.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_base_texture() {
        assert_eq!(normalize_base_texture("item/diamond_sword"), "minecraft:item/diamond_sword");
        assert_eq!(normalize_base_texture("diamond_sword"), "minecraft:item/diamond_sword");
        assert_eq!(normalize_base_texture("item/crossbow_standby"), "minecraft:item/crossbow");
        assert_eq!(normalize_base_texture("mymod:item/wand"), "mymod:item/wand");
        assert_eq!(normalize_base_texture("minecraft:item/bow"), "minecraft:item/bow");
    }

    #[test]
    fn test_archetype_detection() {
        assert_eq!(ItemArchetype::from_texture("minecraft:item/bow"), ItemArchetype::Bow);
        assert_eq!(ItemArchetype::from_texture("minecraft:item/crossbow"), ItemArchetype::Crossbow);
        assert_eq!(ItemArchetype::from_texture("minecraft:item/stick"), ItemArchetype::Plain);
        assert_eq!(ItemArchetype::from_texture("minecraft:item/bowl"), ItemArchetype::Bow);
    }

    #[test]
    fn test_is_convertible() {
        let def: LegacyItemDefinition = serde_json::from_value(json!({
            "textures": {"layer0": "item/bow"},
            "overrides": [{"predicate": {"pulling": 1}, "model": "item/bow_pulling_0"}]
        }))
        .unwrap();
        assert!(!def.is_convertible());

        let def: LegacyItemDefinition = serde_json::from_value(json!({
            "textures": {"layer0": "item/stick"},
            "overrides": [{"predicate": {"damage": 0.5}, "model": "item/stick_2"}]
        }))
        .unwrap();
        assert!(def.is_convertible());

        assert!(!LegacyItemDefinition::default().is_convertible());
    }

    #[test]
    fn test_classify_plain_mixed_predicates() {
        let overrides = vec![
            Override::new(json!({"custom_model_data": 3}), "item/a"),
            Override::new(json!({"damage": 0.5}), "item/b"),
            Override::new(json!({"pulling": 1}), "item/ignored"),
            Override {
                predicate: json!({"custom_model_data": 4}).as_object().cloned().unwrap(),
                model: None,
            },
        ];

        let plain = classify_plain(&overrides);
        // A single damage override flips the property for every entry.
        assert_eq!(plain.property, DispatchProperty::Damage);
        assert_eq!(plain.entries.len(), 2);
        assert_eq!(plain.entries[0].threshold, Threshold::Integer(3));
        assert_eq!(plain.entries[1].threshold, Threshold::Literal(json!(0.5)));
    }

    #[test]
    fn test_custom_model_data_truncates_floats() {
        let o = Override::new(json!({"custom_model_data": 7.9}), "item/a");
        assert_eq!(o.custom_model_data(), Some(7));
        let o = Override::new(json!({"custom_model_data": "12"}), "item/a");
        assert_eq!(o.custom_model_data(), Some(12));
    }

    #[test]
    fn test_group_overrides_crossbow() {
        let overrides = vec![
            Override::new(json!({"custom_model_data": 2}), "item/cb_2"),
            Override::new(json!({"custom_model_data": 1}), "item/cb_1"),
            Override::new(json!({"custom_model_data": 1, "pulling": 1, "pull": 0.5}), "item/cb_1_pull"),
            Override::new(json!({"custom_model_data": 1, "charged": 1}), "item/cb_1_arrow"),
            Override::new(json!({"custom_model_data": 1, "charged": 1, "firework": 1}), "item/cb_1_rocket"),
            Override::new(json!({"custom_model_data": 1}), "item/cb_1_again"),
            Override::new(json!({"pulling": 1}), "item/no_cmd"),
        ];

        let groups = group_overrides(&overrides, ItemArchetype::Crossbow);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].custom_model_data, 2);
        assert_eq!(groups[1].custom_model_data, 1);

        let g = &groups[1];
        assert_eq!(g.base.as_deref(), Some("item/cb_1_again"));
        assert_eq!(g.arrow.as_deref(), Some("item/cb_1_arrow"));
        assert_eq!(g.firework.as_deref(), Some("item/cb_1_rocket"));
        assert_eq!(g.pulling_states, vec![PullingState { pull: 0.5, model: "item/cb_1_pull".into() }]);
    }

    #[test]
    fn test_group_overrides_merges_truncated_values() {
        let overrides = vec![
            Override::new(json!({"custom_model_data": 1}), "item/bow_1"),
            Override::new(json!({"custom_model_data": 1.5, "pulling": 1}), "item/bow_1_pull"),
        ];

        let groups = group_overrides(&overrides, ItemArchetype::Bow);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].base.as_deref(), Some("item/bow_1"));
        assert_eq!(groups[0].pulling_states[0].model, "item/bow_1_pull");
    }

    #[test]
    fn test_group_overrides_bow_treats_charged_as_base() {
        let overrides = vec![
            Override::new(json!({"custom_model_data": 5, "charged": 1}), "item/bow_5"),
            Override::new(json!({"custom_model_data": 5, "pulling": 1}), "item/bow_5_pull"),
        ];

        let groups = group_overrides(&overrides, ItemArchetype::Bow);
        assert_eq!(groups[0].base.as_deref(), Some("item/bow_5"));
        assert_eq!(groups[0].arrow, None);
        assert_eq!(groups[0].pulling_states[0].pull, 0.0);
    }

    #[test]
    fn test_firework_truthiness() {
        assert!(!Override::new(json!({"firework": 0}), "m").is_firework());
        assert!(Override::new(json!({"firework": 1}), "m").is_firework());
        assert!(Override::new(json!({"firework": true}), "m").is_firework());
        assert!(!Override::new(json!({}), "m").is_firework());
    }
}
