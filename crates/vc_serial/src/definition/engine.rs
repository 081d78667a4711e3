use alloc::format;

use vc_node::validation::{ErrorNode, ValidatedMapping, ValidationNode};
use vc_node::{DataNode, MappingNode, ValueNode};

use super::DataDefinition;
use crate::error::{Result, SerializationError};
use crate::manager::Session;
use crate::registry::Serializable;

// -----------------------------------------------------------------------------
// Read

pub(crate) fn read<T: Serializable>(
    session: &Session<'_>,
    definition: &DataDefinition<T>,
    node: &MappingNode,
    existing: Option<T>,
) -> Result<T> {
    // Checked up front so a failing read never builds an instance.
    if let Some(field) = definition
        .fields()
        .iter()
        .find(|field| field.is_required() && !node.contains_key(field.key))
    {
        return Err(SerializationError::MissingRequiredField {
            type_name: definition.type_name(),
            field: field.key,
        });
    }

    let mut instance = match existing {
        Some(instance) => instance,
        None => session.instantiate::<T>()?,
    };

    for (key, child) in node.iter() {
        match definition.field(key) {
            Some(field) => field
                .ops
                .read(session, child, &mut instance)
                .map_err(|e| e.in_field(definition.type_name(), field.key))?,
            None => log::warn!(
                "ignoring unknown key `{key}` while reading `{}`",
                definition.type_name()
            ),
        }
    }

    if !session.skip_hook() {
        definition.run_hook(&mut instance);
    }
    Ok(instance)
}

// -----------------------------------------------------------------------------
// Write

pub(crate) fn write<T: Serializable>(
    session: &Session<'_>,
    definition: &DataDefinition<T>,
    value: &T,
    always_write: bool,
) -> Result<DataNode> {
    let default = if always_write {
        None
    } else {
        definition.default_instance()
    };

    let mut mapping = MappingNode::with_capacity(definition.fields().len());
    for field in definition.fields() {
        if let Some(default) = default
            && !field.always_written()
            && field.is_default(session, value, default)
        {
            continue;
        }

        let node = field
            .ops
            .write(session, value, always_write)
            .map_err(|e| e.in_field(definition.type_name(), field.key))?;
        mapping.insert(field.key, node);
    }
    Ok(mapping.into())
}

// -----------------------------------------------------------------------------
// Validate

pub(crate) fn validate<T: Serializable>(
    session: &Session<'_>,
    definition: &DataDefinition<T>,
    node: &MappingNode,
) -> ValidationNode {
    let mut result = ValidatedMapping::default();

    for (key, child) in node.iter() {
        let child_result = match definition.field(key) {
            Some(field) => field.ops.validate(session, child),
            None => ErrorNode::new(
                child.copy(),
                format!("unknown field `{key}` for `{}`", definition.type_name()),
            )
            .into(),
        };
        result.push(key.as_str(), child_result);
    }

    for field in definition.fields() {
        if field.is_required() && !node.contains_key(field.key) {
            let mut missing = ValueNode::null();
            missing.set_location(node.location());
            result.push(
                field.key,
                ValidationNode::error(
                    missing,
                    format!("required field `{}` is missing", field.key),
                ),
            );
        }
    }

    result.into()
}

// -----------------------------------------------------------------------------
// Copy

pub(crate) fn copy_to<T: Serializable>(
    session: &Session<'_>,
    definition: &DataDefinition<T>,
    source: &T,
    target: &mut T,
) -> Result<()> {
    for field in definition.fields() {
        field
            .ops
            .copy(session, source, target)
            .map_err(|e| e.in_field(definition.type_name(), field.key))?;
    }

    if !session.skip_hook() {
        definition.run_hook(target);
    }
    Ok(())
}
