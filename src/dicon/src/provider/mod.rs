pub mod closure;
pub mod component;
pub mod instance;
pub mod scoped;

use std::fmt::Debug;

use crate::container::injector::{InjectionError, Injector, TypedInjector};
use crate::container::Managed;
use crate::key::ComponentRef;

/// A universal factory which constructs objects of one type.
///
/// A [`Provider`] is responsible for constructing an object on each request
/// and retrieving all dependencies from an [`Injector`]. It also declares
/// those dependencies up front, so that a registry can check the dependency
/// graph before any object is built.
///
/// Usually, you don't need to implement [`Provider`] manually, since this is
/// automatically done by [`TypedProvider`]'s blanket implementation.
pub trait Provider: Debug + Send + Sync + 'static {
    /// Provides a type-erased object.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be fetched or the object
    /// construction fails.
    fn dyn_provide(&self, injector: &dyn Injector) -> Result<Box<dyn Managed>, InjectionError>;

    /// Returns every reference this provider resolves while providing.
    fn dyn_dependencies(&self) -> Vec<ComponentRef>;
}

/// A static variant of the [`Provider`] trait, leveraging static dispatch and
/// type-safety.
pub trait TypedProvider: Provider {
    /// The return type in response to each request to the provider.
    type Output: Managed;

    /// Provides an object of type [`TypedProvider::Output`].
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be fetched or the object
    /// construction fails.
    fn provide<I>(&self, injector: &I) -> Result<Self::Output, InjectionError>
    where
        I: TypedInjector + ?Sized;

    fn dependencies(&self) -> Vec<ComponentRef> {
        Vec::new()
    }
}

impl<T: TypedProvider> Provider for T {
    fn dyn_provide(&self, injector: &dyn Injector) -> Result<Box<dyn Managed>, InjectionError> {
        self.provide(injector)
            .map(|obj| -> Box<dyn Managed> { Box::new(obj) })
    }

    fn dyn_dependencies(&self) -> Vec<ComponentRef> {
        self.dependencies()
    }
}
