use std::any;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::injector::{InjectionError, TypedInjector};
use crate::container::Managed;
use crate::key::ComponentRef;
use crate::provider::closure::Closure;
use crate::provider::TypedProvider;

/// A [`Provider`] which supplies objects from a [`Closure`].
///
/// Note that each argument of the closure is fetched without specifying a
/// qualifier.
///
/// # Examples
///
/// ```rust
/// # use std::convert::Infallible;
/// # use dicon::provider::closure::ClosureProvider;
/// let closure = |a: i32, b: f64| Ok::<_, Infallible>((a, b));
/// let provider = ClosureProvider::new(closure);
/// ```
///
/// [`Provider`]: crate::provider::Provider
pub struct ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    closure: C,
    _marker: PhantomData<fn() -> (T, D)>,
}

impl<T, C, D> ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    /// Creates a new [`ClosureProvider`] from a [`Closure`].
    pub fn new(closure: C) -> Self {
        Self {
            closure,
            _marker: PhantomData,
        }
    }
}

impl<T, C, D> Debug for ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClosureProvider")
            .field("output", &any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T, C, D> TypedProvider for ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    type Output = T;

    fn provide<I>(&self, injector: &I) -> Result<Self::Output, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        match self.closure.run(injector.upcast_dyn()) {
            Ok(Ok(obj)) => Ok(obj),
            Ok(Err(err)) => Err(InjectionError::ObjectConstruction {
                component: any::type_name::<T>(),
                source: Arc::from(err.into()),
            }),
            Err(err) => Err(err),
        }
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.closure.dependencies()
    }
}
