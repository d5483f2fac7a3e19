use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::container::injector::{InjectionError, TypedInjector};
use crate::container::Managed;
use crate::provider::TypedProvider;

/// Hands out clones of a pre-built value.
pub struct InstanceProvider<T>
where
    T: Managed + Clone,
{
    instance: T,
}

impl<T> InstanceProvider<T>
where
    T: Managed + Clone,
{
    pub fn new(instance: T) -> Self {
        Self { instance }
    }
}

impl<T> Debug for InstanceProvider<T>
where
    T: Managed + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InstanceProvider")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> TypedProvider for InstanceProvider<T>
where
    T: Managed + Clone,
{
    type Output = T;

    fn provide<I>(&self, _injector: &I) -> Result<Self::Output, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        Ok(self.instance.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::container::injector::MockInjector;

    use super::*;

    #[test]
    fn instance_provider_succeeds() {
        let provider = InstanceProvider::new(Arc::new(42));
        let injector = MockInjector::new();

        let first = provider.provide(&injector).unwrap();
        let second = provider.provide(&injector).unwrap();
        assert_eq!(*first, 42);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(provider.dependencies().is_empty());
    }
}
