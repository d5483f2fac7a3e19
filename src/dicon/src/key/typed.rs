use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use crate::container::Managed;
use crate::key::{Key, Qualifier};

/// A [`Key`] whose target type is statically known to be `T`.
///
/// Typed keys are what the binding and lookup APIs accept, so that a lookup
/// through `TypedKey<T>` always yields a `T`. Use [`key::of`], [`key::named`]
/// or [`key::qualified`] to create one.
///
/// [`key::of`]: crate::key::of
/// [`key::named`]: crate::key::named
/// [`key::qualified`]: crate::key::qualified
pub struct TypedKey<T>
where
    T: Managed,
{
    key: Key,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedKey<T>
where
    T: Managed,
{
    pub(crate) fn new(qualifier: Option<Box<dyn Qualifier>>) -> Self {
        Self {
            key: Key::new::<T>(qualifier),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn into_key(self) -> Key {
        self.key
    }
}

impl<T> Clone for TypedKey<T>
where
    T: Managed,
{
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for TypedKey<T>
where
    T: Managed,
{
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for TypedKey<T> where T: Managed {}

impl<T> Debug for TypedKey<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.key, f)
    }
}

impl<T> Display for TypedKey<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.key, f)
    }
}

impl<T> AsRef<Key> for TypedKey<T>
where
    T: Managed,
{
    fn as_ref(&self) -> &Key {
        &self.key
    }
}

impl<T> From<TypedKey<T>> for Key
where
    T: Managed,
{
    fn from(key: TypedKey<T>) -> Self {
        key.key
    }
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use crate::key;

    use super::*;

    #[test]
    fn typed_key_target_succeeds() {
        let plain = key::of::<i32>();
        let named = key::named::<i32>("name");

        assert_eq!(plain.key().target(), TypeId::of::<i32>());
        assert_eq!(named.key().target(), TypeId::of::<i32>());
        assert!(!plain.key().is_qualified());
        assert!(named.key().is_qualified());
        assert_ne!(plain, named);
        assert_eq!(named.clone(), named);
    }
}
