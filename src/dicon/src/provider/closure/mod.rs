mod implementation;
mod wrapper;

use std::error::Error;

use crate::container::injector::{InjectionError, Injector};
use crate::container::Managed;
use crate::key::ComponentRef;

pub use wrapper::ClosureProvider;

/// A specialized form of [`Fn`] that can be called by supplying arguments
/// retrieved from an [`Injector`].
///
/// Closures of `Fn(A1, A2, ...) -> Result<T, E> + Send + Sync + 'static`
/// where `Ai: Managed` are [`Closure`]. Note that each argument is fetched
/// without specifying a qualifier.
///
/// Usually you don't need to use a [`Closure`] directly. The most recommended
/// way is to use `to_closure()` in the [`dsl`]. Or wrap your [`Closure`] in a
/// [`ClosureProvider`] if you need low-level control.
///
/// [`Closure`] is only implemented by closures whose arity is at most 16.
///
/// [`dsl`]: crate::module::dsl
pub trait Closure<D>
where
    Self: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// The successfully constructed object.
    type Constructed: Managed;

    /// The error occurred in object construction after all dependencies are
    /// retrieved.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Retrieves the dependencies from the injector and calls `self` with
    /// these dependencies.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be fetched.
    ///
    /// Returns an inner error [`Closure::Error`] wrapped in the outer [`Ok`]
    /// if the object construction fails.
    fn run(
        &self,
        injector: &dyn Injector,
    ) -> Result<Result<Self::Constructed, Self::Error>, InjectionError>;

    /// Returns one unqualified reference per argument, in order.
    fn dependencies(&self) -> Vec<ComponentRef>;
}
