//! Item model documents written to items/*.json.
//!
//! These types only serialize. Field names and `type` strings are the exact
//! spellings the game reads, including the unprefixed `model` and
//! `range_dispatch` used at the top level.

use serde::Serialize;
use serde_json::Value;

pub const TYPE_MODEL: &str = "model";
pub const TYPE_RANGE_DISPATCH: &str = "range_dispatch";
pub const TYPE_NS_MODEL: &str = "minecraft:model";
pub const TYPE_NS_RANGE_DISPATCH: &str = "minecraft:range_dispatch";
pub const TYPE_NS_CONDITION: &str = "minecraft:condition";
pub const TYPE_NS_SELECT: &str = "minecraft:select";
pub const TYPE_DYE: &str = "minecraft:dye";

pub const PROPERTY_USING_ITEM: &str = "minecraft:using_item";
pub const PROPERTY_CHARGE_TYPE: &str = "minecraft:charge_type";
pub const PROPERTY_USE_DURATION: &str = "minecraft:use_duration";
pub const PROPERTY_CROSSBOW_PULL: &str = "minecraft:crossbow/pull";

/// Vanilla leather brown as a packed signed color.
pub const DEFAULT_DYE_COLOR: i32 = -6265536;

/// Ticks to seconds-ish scale applied to bow use duration.
pub const BOW_USE_DURATION_SCALE: f64 = 0.05;

/// Property a top-level range dispatch switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchProperty {
    CustomModelData,
    Damage,
}

impl DispatchProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchProperty::CustomModelData => "custom_model_data",
            DispatchProperty::Damage => "damage",
        }
    }
}

/// A full items/*.json document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDefinition {
    pub model: RangeDispatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
}

/// Any node of the item model tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemModel {
    Model(ModelNode),
    RangeDispatch(RangeDispatch),
    Condition(Condition),
    Select(Select),
}

/// Direct reference to a model file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelNode {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub model: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tints: Vec<Tint>,
}

impl ModelNode {
    /// `{"type": "model", ...}` as used at the top level and for plain entries.
    pub fn plain(model: impl Into<String>) -> Self {
        Self {
            kind: TYPE_MODEL,
            model: model.into(),
            tints: Vec::new(),
        }
    }

    /// `{"type": "minecraft:model", ...}` as used inside bow/crossbow trees.
    pub fn namespaced(model: impl Into<String>) -> Self {
        Self {
            kind: TYPE_NS_MODEL,
            model: model.into(),
            tints: Vec::new(),
        }
    }

    pub fn with_tints(mut self, tints: Vec<Tint>) -> Self {
        self.tints = tints;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tint {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub default: i32,
}

impl Tint {
    /// The leather armor dye tint.
    pub fn dye() -> Self {
        Self {
            kind: TYPE_DYE,
            default: DEFAULT_DYE_COLOR,
        }
    }
}

/// Picks the last entry whose threshold is at or below the property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeDispatch {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub property: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    pub fallback: Box<ItemModel>,
    pub entries: Vec<DispatchEntry>,
}

impl RangeDispatch {
    /// The top-level dispatch of an item document.
    pub fn top_level(property: DispatchProperty, fallback: ItemModel) -> Self {
        Self {
            kind: TYPE_RANGE_DISPATCH,
            property: property.as_str(),
            scale: None,
            fallback: Box::new(fallback),
            entries: Vec::new(),
        }
    }

    /// A nested `minecraft:range_dispatch`.
    pub fn nested(property: &'static str, scale: Option<f64>, fallback: ItemModel) -> Self {
        Self {
            kind: TYPE_NS_RANGE_DISPATCH,
            property,
            scale,
            fallback: Box::new(fallback),
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchEntry {
    pub threshold: Threshold,
    pub model: ItemModel,
}

/// Entry threshold as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Threshold {
    /// Custom model data index.
    Integer(i64),
    /// Pull progress.
    Float(f64),
    /// Damage value exactly as written in the legacy predicate.
    Literal(Value),
}

/// Boolean switch on an item property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub property: &'static str,
    pub on_false: Box<ItemModel>,
    pub on_true: Box<ItemModel>,
}

impl Condition {
    /// Switch on whether the item is currently being used.
    pub fn using_item(on_false: ItemModel, on_true: ItemModel) -> Self {
        Self {
            kind: TYPE_NS_CONDITION,
            property: PROPERTY_USING_ITEM,
            on_false: Box::new(on_false),
            on_true: Box::new(on_true),
        }
    }
}

/// Switch on a string-valued item property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Select {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub property: &'static str,
    pub fallback: Box<ItemModel>,
    pub cases: Vec<SelectCase>,
}

impl Select {
    /// Switch on what a crossbow is loaded with.
    pub fn charge_type(fallback: ItemModel) -> Self {
        Self {
            kind: TYPE_NS_SELECT,
            property: PROPERTY_CHARGE_TYPE,
            fallback: Box::new(fallback),
            cases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectCase {
    pub model: ItemModel,
    pub when: &'static str,
}
