mod lazy;

use std::error::Error;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::Managed;
use crate::key::{ComponentRef, Key, TypedKey};
use crate::util::any::Downcast;

pub use lazy::Lazy;

/// Object-safe access to the components of a container.
#[cfg_attr(test, mockall::automock)]
pub trait Injector: Send + Sync {
    /// Resolves `reference` to a fresh value, or to a container value for
    /// references carrying a shape. `Ok(None)` means the key is not bound.
    fn dyn_get(
        &self,
        reference: &ComponentRef,
    ) -> Result<Option<Box<dyn Managed>>, InjectionError>;
}

pub trait TypedInjector: Injector {
    fn get<T>(&self, key: &TypedKey<T>) -> Result<Option<T>, InjectionError>
    where
        T: Managed,
    {
        let reference = ComponentRef::direct(key.key().clone());
        match self.dyn_get(&reference)? {
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(object) => Ok(Some(*object)),
                Err(_) => unreachable!("the object's type should be `T`"),
            },
            None => Ok(None),
        }
    }

    /// Like [`get`](TypedInjector::get), but hands out a [`Lazy`] handle
    /// instead of constructing the component now.
    fn get_lazy<T>(&self, key: &TypedKey<T>) -> Result<Option<Lazy<T>>, InjectionError>
    where
        T: Managed,
    {
        let reference = ComponentRef::lazy(key.clone());
        match self.dyn_get(&reference)? {
            Some(boxed) => match boxed.downcast::<Lazy<T>>() {
                Ok(lazy) => Ok(Some(*lazy)),
                Err(_) => unreachable!("the object's type should be `Lazy<T>`"),
            },
            None => Ok(None),
        }
    }

    fn upcast_dyn(&self) -> &dyn Injector;
}

impl<T> TypedInjector for T
where
    T: Injector,
{
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

impl TypedInjector for dyn Injector + '_ {
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum InjectionError {
    #[snafu(display("could not find the object identified by the given key {key}"))]
    #[non_exhaustive]
    NotFound { key: Key },
    #[snafu(display("the context that handed out the lazy handle for {key} was dropped"))]
    #[non_exhaustive]
    ContextDropped { key: Key },
    #[snafu(display("component {component} depends on {dependency}, which is not bound"))]
    #[non_exhaustive]
    Unsatisfied {
        component: &'static str,
        dependency: ComponentRef,
    },
    #[snafu(display("argument #{index} of component {component} is not a {expected}"))]
    #[non_exhaustive]
    InvalidArgument {
        component: &'static str,
        index: usize,
        expected: &'static str,
    },
    #[snafu(display("could not construct the object {component}"))]
    #[non_exhaustive]
    ObjectConstruction {
        component: &'static str,
        source: Arc<dyn Error + Send + Sync>,
    },
}
