use crate::registry::SerializerRegistry;

/// Codecs scoped to a single call.
///
/// Codecs and erased readers found in the context are used before those of
/// the manager. Data definitions in the context are ignored.
pub trait SerializationContext: Send + Sync {
    fn serializers(&self) -> &SerializerRegistry;
}

impl SerializationContext for SerializerRegistry {
    #[inline]
    fn serializers(&self) -> &SerializerRegistry {
        self
    }
}
