//! The generic engine for field-based types.
//!
//! A type describes its fields once through [`Describe`] (or
//! `#[derive(DataDefinition)]`). The resulting [`DataDefinition`] is cached in
//! the registry and drives reading, writing, validating and copying for every
//! capability the type's codecs do not cover.
//!
//! - Reading requires a mapping. Missing required keys fail the read before an
//!   instance is created, missing optional keys keep the instance's value and
//!   unknown keys are ignored.
//! - Writing skips fields equal to the default instance unless forced.
//! - Validation reports unknown keys and missing required keys.
//! - The post-read hook runs once after a read or copy unless the call skips hooks.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod engine;
mod field;

// -----------------------------------------------------------------------------
// Exports

pub use builder::DefinitionBuilder;
pub use field::{FieldConfig, FieldFlags, FieldSpec};

pub(crate) use engine::{copy_to as copy_fields, read as read_fields};
pub(crate) use engine::{validate as validate_fields, write as write_fields};

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::type_name;
use core::fmt;
use std::sync::OnceLock;

use vc_utils::HashMap;

use crate::registry::SerializerRegistry;

// -----------------------------------------------------------------------------
// Describe

/// Describes the fields of a type for the data definition engine.
pub trait Describe: Sized + Send + Sync + 'static {
    fn describe() -> DefinitionBuilder<Self>;
}

// -----------------------------------------------------------------------------
// DataDefinition

/// The compiled field table of `T`.
pub struct DataDefinition<T> {
    type_name: &'static str,
    fields: Box<[FieldSpec<T>]>,
    index: HashMap<&'static str, usize>,
    constructor: Option<fn() -> T>,
    hook: Option<fn(&mut T)>,
    default_instance: OnceLock<Option<T>>,
}

impl<T: Send + Sync + 'static> DataDefinition<T> {
    pub(crate) fn new(
        fields: Vec<FieldSpec<T>>,
        constructor: Option<fn() -> T>,
        hook: Option<fn(&mut T)>,
    ) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.key, i))
            .collect();
        Self {
            type_name: type_name::<T>(),
            fields: fields.into_boxed_slice(),
            index,
            constructor,
            hook,
            default_instance: OnceLock::new(),
        }
    }

    /// Fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec<T>> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn constructor(&self) -> Option<fn() -> T> {
        self.constructor
    }

    #[inline]
    pub fn hook(&self) -> Option<fn(&mut T)> {
        self.hook
    }

    /// The instance fields are compared against when writing, built once.
    ///
    /// `None` without a constructor, in which case every field is written.
    pub fn default_instance(&self) -> Option<&T> {
        self.default_instance
            .get_or_init(|| self.constructor.map(|constructor| constructor()))
            .as_ref()
    }

    pub(crate) fn run_hook(&self, instance: &mut T) {
        if let Some(hook) = self.hook {
            hook(instance);
        }
    }

    pub(crate) fn register_dependencies(&self, registry: &mut SerializerRegistry) {
        for field in self.fields.iter() {
            field.ops.register(registry);
        }
    }
}

impl<T> fmt::Debug for DataDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataDefinition")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("constructor", &self.constructor.is_some())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Macros

/// Implements [`Serializable`](crate::Serializable) for a type implementing
/// [`Describe`], using only its data definition.
#[macro_export]
macro_rules! impl_serializable_by_definition {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Serializable for $ty {
                fn serializers() -> $crate::TypeSerializers<Self> {
                    $crate::TypeSerializers::from_definition(
                        <Self as $crate::Describe>::describe().build(),
                    )
                }
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use vc_node::{DataNode, MappingNode, SequenceNode};

    use crate::{DataDefinition, Describe, ErasedValue, ManagerConfig};
    use crate::{SerializationError, SerializationManager};

    fn manager() -> SerializationManager {
        let mut manager = SerializationManager::new();
        manager.initialize();
        manager
    }

    #[derive(DataDefinition, Default, Debug, PartialEq)]
    #[data(hook = Recipe::on_read)]
    struct Recipe {
        #[data(required)]
        id: String,
        #[data(always_write)]
        time: f32,
        ingredients: Vec<String>,
        #[data(skip)]
        reads: u32,
    }

    impl Recipe {
        fn on_read(&mut self) {
            self.reads += 1;
        }
    }

    #[derive(DataDefinition, Default, Debug)]
    struct Shared {
        #[data(by_ref)]
        data: Arc<Vec<i32>>,
        #[data(no_eq)]
        label: String,
    }

    #[derive(DataDefinition, Debug, PartialEq)]
    #[data(no_default)]
    struct Handle {
        id: u32,
    }

    #[derive(DataDefinition, Default, Debug, PartialEq)]
    struct Pair<T: Default + PartialEq> {
        first: T,
        #[data(key = "2nd")]
        second: T,
    }

    fn recipe_node(entries: &[(&str, &str)]) -> DataNode {
        MappingNode::from_iter(entries.iter().copied()).into()
    }

    #[test]
    fn describe_lists_fields() {
        let definition = Recipe::describe().build();
        let keys: Vec<&str> = definition.fields().iter().map(|f| f.key()).collect();
        assert_eq!(keys, ["id", "time", "ingredients"]);
        assert!(definition.field("id").unwrap().is_required());
        assert!(!definition.field("time").unwrap().is_required());
        assert!(definition.hook().is_some());
        assert!(Shared::describe().build().field("data").unwrap().is_by_reference());
    }

    #[test]
    fn missing_required_field_fails() {
        let manager = manager();
        let error = manager
            .read_value::<Recipe>(&recipe_node(&[("time", "1")]))
            .unwrap_err();
        assert!(matches!(
            error,
            SerializationError::MissingRequiredField { field: "id", .. }
        ));
    }

    #[test]
    fn absent_keys_keep_defaults() {
        let manager = manager();
        let recipe: Recipe = manager
            .read_value(&recipe_node(&[("id", "bread"), ("unknown", "1")]))
            .unwrap();
        assert_eq!(recipe.id, "bread");
        assert_eq!(recipe.time, 0.0);
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn hook_runs_once_unless_skipped() {
        let manager = manager();
        let node = recipe_node(&[("id", "bread")]);

        let recipe: Recipe = manager.read_value(&node).unwrap();
        assert_eq!(recipe.reads, 1);

        let recipe: Recipe = manager.read_value_with(&node, None, true).unwrap();
        assert_eq!(recipe.reads, 0);

        let copy = manager.create_copy(&recipe, false).unwrap();
        assert_eq!(copy.reads, 1);
        let copy = manager.create_copy(&recipe, true).unwrap();
        assert_eq!(copy.reads, 0);
    }

    #[test]
    fn read_into_existing_instance() {
        let manager = manager();
        let existing = Recipe {
            ingredients: vec![String::from("flour")],
            ..Recipe::default()
        };
        let recipe = manager
            .read_value_into(&recipe_node(&[("id", "bread")]), existing)
            .unwrap();
        assert_eq!(recipe.id, "bread");
        assert_eq!(recipe.ingredients, ["flour"]);
    }

    #[test]
    fn nested_failures_name_the_field() {
        let manager = manager();
        let error = manager
            .read_value::<Recipe>(&recipe_node(&[("id", "bread"), ("time", "soon")]))
            .unwrap_err();
        assert!(matches!(error, SerializationError::Field { field: "time", .. }));
        assert!(matches!(error.root_cause(), SerializationError::InvalidValue { .. }));
    }

    #[test]
    fn write_omits_defaults() {
        let manager = manager();
        let recipe = Recipe {
            id: String::from("bread"),
            ..Recipe::default()
        };

        let node = manager.write_value(&recipe, false).unwrap();
        let mapping = node.as_mapping().unwrap();
        assert!(mapping.contains_key("id"));
        assert!(mapping.contains_key("time"));
        assert!(!mapping.contains_key("ingredients"));
        assert!(!mapping.contains_key("reads"));

        let node = manager.write_value(&recipe, true).unwrap();
        assert!(node.as_mapping().unwrap().contains_key("ingredients"));
    }

    #[test]
    fn write_compares_nodes_without_eq() {
        let manager = manager();
        let node = manager.write_value(&Shared::default(), false).unwrap();
        assert_eq!(node.as_mapping().map(MappingNode::len), Some(0));

        let shared = Shared {
            label: String::from("x"),
            ..Shared::default()
        };
        let node = manager.write_value(&shared, false).unwrap();
        assert_eq!(node.as_mapping().unwrap().get("label"), Some(&DataNode::value("x")));
    }

    #[test]
    fn validate_reports_every_problem() {
        let manager = manager();
        let mut node = MappingNode::new();
        node.insert("time", "soon");
        node.insert("extra", "1");
        node.insert("ingredients", SequenceNode::from_iter(["salt"]));

        let report = manager.validate_node::<Recipe>(&node.into());
        let paths: Vec<String> = report.errors().into_iter().map(|e| e.path).collect();
        assert_eq!(paths, ["time", "extra", "id"]);

        let report = manager.validate_node::<Recipe>(&DataNode::value("bread"));
        assert!(report.as_error().is_some());
    }

    #[test]
    fn copies_are_independent() {
        let manager = manager();
        let source = Recipe {
            id: String::from("bread"),
            time: 1.5,
            ingredients: vec![String::from("flour"), String::from("water")],
            reads: 0,
        };

        let mut copy = manager.create_copy(&source, true).unwrap();
        assert_eq!(copy, source);
        copy.ingredients.push(String::from("salt"));
        assert_eq!(source.ingredients.len(), 2);

        let mut target = Recipe::default();
        manager.copy_to(&source, &mut target, true).unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn by_reference_fields_share() {
        let manager = manager();
        let source = Shared {
            data: Arc::new(vec![1, 2, 3]),
            label: String::from("a"),
        };
        let copy = manager.create_copy(&source, false).unwrap();
        assert!(Arc::ptr_eq(&source.data, &copy.data));
        assert_eq!(copy.label, "a");
    }

    #[test]
    fn instantiators() {
        let mut manager = manager();
        let node = recipe_node(&[]);
        assert!(matches!(
            manager.read_value::<Handle>(&node),
            Err(SerializationError::MissingInstantiator { .. })
        ));

        // Without a default instance every field is written.
        let written = manager.write_value(&Handle { id: 0 }, false).unwrap();
        assert!(written.as_mapping().unwrap().contains_key("id"));

        manager
            .registry_mut()
            .set_instantiator(|| Handle { id: 7 });
        assert_eq!(manager.read_value::<Handle>(&node), Ok(Handle { id: 7 }));
    }

    #[test]
    fn wrong_instance_type_is_reported() {
        let mut manager = manager().with_config(ManagerConfig::LENIENT);
        manager.registry_mut().set_erased_instantiator(
            TypeId::of::<Handle>(),
            Arc::new(|| -> ErasedValue { Box::new(5_u32) }),
        );

        let error = manager.read_value::<Handle>(&recipe_node(&[])).unwrap_err();
        assert!(matches!(error, SerializationError::WrongInstanceType { .. }));
        assert!(error.is_contract_violation());
    }

    #[test]
    #[should_panic(expected = "instantiator did not return")]
    fn wrong_instance_type_panics_when_strict() {
        let mut manager = manager().with_config(ManagerConfig::STRICT);
        manager.registry_mut().set_erased_instantiator(
            TypeId::of::<Handle>(),
            Arc::new(|| -> ErasedValue { Box::new(5_u32) }),
        );
        let _ = manager.read_value::<Handle>(&recipe_node(&[]));
    }

    #[test]
    fn generic_definitions() {
        let manager = manager();
        let pair: Pair<i32> = manager
            .read_value(&recipe_node(&[("first", "1"), ("2nd", "2")]))
            .unwrap();
        assert_eq!(pair, Pair { first: 1, second: 2 });

        let pair = Pair {
            first: String::new(),
            second: String::from("b"),
        };
        assert_eq!(
            manager.write_value(&pair, false),
            Ok(recipe_node(&[("2nd", "b")]))
        );
    }
}
