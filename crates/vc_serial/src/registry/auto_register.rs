use super::{Serializable, SerializerRegistry, TypeSerializers};

// -----------------------------------------------------------------------------
// AutoRegistration

/// A registration collected at link time.
///
/// Submitted by [`auto_register!`](crate::auto_register) and by
/// `#[data(auto_register)]` on derived types.
#[doc(hidden)]
pub struct AutoRegistration {
    register: fn(&mut SerializerRegistry),
}

impl AutoRegistration {
    #[inline]
    pub const fn of<T: Serializable>() -> Self {
        Self {
            register: SerializerRegistry::register::<T>,
        }
    }
}

inventory::collect!(AutoRegistration);

/// Registered by this crate itself; present after collection only if the
/// platform supports link-time registration.
struct AvailFlag;

impl Serializable for AvailFlag {
    fn serializers() -> TypeSerializers<Self> {
        TypeSerializers::new()
    }
}

inventory::submit! { AutoRegistration::of::<AvailFlag>() }

impl SerializerRegistry {
    /// Registers every type submitted through [`auto_register!`](crate::auto_register).
    ///
    /// Returns `false` if the platform does not support link-time collection.
    /// Repeated calls are cheap.
    pub fn auto_register(&mut self) -> bool {
        if self.contains::<AvailFlag>() {
            return true;
        }
        let mut count = 0_usize;
        for registration in inventory::iter::<AutoRegistration> {
            (registration.register)(self);
            count += 1;
        }
        log::debug!("collected {count} auto registrations");
        self.contains::<AvailFlag>()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{DataDefinition, SerializerRegistry};

    #[derive(DataDefinition, Default, PartialEq, Debug)]
    #[data(auto_register)]
    struct Collected {
        value: i32,
    }

    #[test]
    fn derived_types_are_collected() {
        let mut registry = SerializerRegistry::new();
        assert!(registry.auto_register());
        assert!(registry.contains::<Collected>());
        assert!(registry.contains::<i32>());

        let len = registry.len();
        assert!(registry.auto_register());
        assert_eq!(registry.len(), len);
    }
}
