//! Legacy override lists to item model dispatch trees.

use crate::error::{MigrateError, Result};
use crate::item_model::{
    Condition, DispatchEntry, DispatchProperty, ItemDefinition, ItemModel, ModelNode,
    RangeDispatch, Select, SelectCase, Threshold, Tint, BOW_USE_DURATION_SCALE,
    PROPERTY_CROSSBOW_PULL, PROPERTY_USE_DURATION,
};
use crate::legacy::{
    classify_plain, group_overrides, is_leather_item, ItemArchetype, LegacyItemDefinition,
    OverrideGroup,
};
use crate::migrate::MigrationReport;
use crate::resource_pack::layout::{json_files, read_json, write_json};
use crate::resource_pack::PackLayout;
use std::path::Path;
use tracing::{info, warn};

/// Build the item model document for a legacy definition.
///
/// A definition without a `layer0` texture has no fallback and is rejected.
/// A definition without an `overrides` key yields an empty dispatch.
pub fn convert_definition(definition: &LegacyItemDefinition) -> Result<ItemDefinition> {
    let base_texture = definition.normalized_base_texture().ok_or_else(|| {
        MigrateError::InvalidDefinition("missing textures.layer0".to_string())
    })?;

    let tints = if is_leather_item(&base_texture) {
        vec![Tint::dye()]
    } else {
        Vec::new()
    };

    let fallback = ItemModel::Model(ModelNode::plain(&base_texture).with_tints(tints.clone()));
    let mut dispatch = RangeDispatch::top_level(DispatchProperty::CustomModelData, fallback);

    if let Some(overrides) = &definition.overrides {
        match ItemArchetype::from_texture(&base_texture) {
            ItemArchetype::Plain => {
                let plain = classify_plain(overrides);
                dispatch.property = plain.property.as_str();
                dispatch.entries = plain
                    .entries
                    .into_iter()
                    .map(|entry| DispatchEntry {
                        threshold: entry.threshold,
                        model: ItemModel::Model(
                            ModelNode::plain(entry.model).with_tints(tints.clone()),
                        ),
                    })
                    .collect();
            }
            archetype => {
                dispatch.entries = group_overrides(overrides, archetype)
                    .into_iter()
                    .map(|group| build_group_entry(group, archetype, &base_texture))
                    .collect();
            }
        }
    }

    Ok(ItemDefinition {
        model: dispatch,
        display: definition.display.clone(),
    })
}

/// Turn one bow/crossbow override group into a `using_item` condition.
fn build_group_entry(
    mut group: OverrideGroup,
    archetype: ItemArchetype,
    base_texture: &str,
) -> DispatchEntry {
    group
        .pulling_states
        .sort_by(|a, b| a.pull.total_cmp(&b.pull));

    let base_model = group
        .base
        .clone()
        .or_else(|| group.pulling_states.first().map(|s| s.model.clone()))
        .unwrap_or_else(|| base_texture.to_string());
    let base_node = || ItemModel::Model(ModelNode::namespaced(&base_model));

    let on_false = match archetype {
        ItemArchetype::Crossbow => {
            let mut select = Select::charge_type(base_node());
            // A rocket case only exists alongside an arrow case.
            if let Some(arrow) = &group.arrow {
                select.cases.push(SelectCase {
                    model: ItemModel::Model(ModelNode::namespaced(arrow)),
                    when: "arrow",
                });
                if let Some(firework) = &group.firework {
                    select.cases.push(SelectCase {
                        model: ItemModel::Model(ModelNode::namespaced(firework)),
                        when: "rocket",
                    });
                }
            }
            ItemModel::Select(select)
        }
        _ => base_node(),
    };

    let (property, scale) = match archetype {
        ItemArchetype::Crossbow => (PROPERTY_CROSSBOW_PULL, None),
        _ => (PROPERTY_USE_DURATION, Some(BOW_USE_DURATION_SCALE)),
    };
    let mut pulling = RangeDispatch::nested(property, scale, base_node());
    pulling.entries = group
        .pulling_states
        .iter()
        .filter(|state| state.model != base_model)
        .map(|state| DispatchEntry {
            threshold: Threshold::Float(state.pull),
            model: ItemModel::Model(ModelNode::namespaced(&state.model)),
        })
        .collect();

    DispatchEntry {
        threshold: Threshold::Integer(group.custom_model_data),
        model: ItemModel::Condition(Condition::using_item(
            on_false,
            ItemModel::RangeDispatch(pulling),
        )),
    }
}

/// Convert one legacy file into `out_dir`, deleting the source on success.
///
/// Returns `false` when the file has nothing to convert and was left alone.
pub fn convert_file(path: &Path, out_dir: &Path) -> Result<bool> {
    let definition: LegacyItemDefinition = read_json(path)?;
    if !definition.is_convertible() {
        return Ok(false);
    }

    let converted = convert_definition(&definition)?;
    let file_name = path.file_name().ok_or_else(|| {
        MigrateError::InvalidDefinition(format!("no file name in {}", path.display()))
    })?;

    write_json(&out_dir.join(file_name), &converted)?;
    std::fs::remove_file(path)?;
    Ok(true)
}

/// Convert every legacy item definition under models/item.
///
/// Output is flattened into the items directory by file name. Failures are
/// logged per file and never stop the walk.
pub fn convert_directory(layout: &PackLayout, report: &mut MigrationReport) {
    let out_dir = layout.items_dir();

    for path in json_files(&layout.legacy_items_dir()) {
        match convert_file(&path, &out_dir) {
            Ok(true) => {
                info!("Converted: {}", path.display());
                report.items_converted += 1;
            }
            Ok(false) => report.items_skipped += 1,
            Err(e) => {
                warn!("Error processing {}: {}", path.display(), e);
                report.errors += 1;
            }
        }
    }
}
