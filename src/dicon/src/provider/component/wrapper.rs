use std::any;
use std::convert;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::container::injector::{InjectionError, TypedInjector};
use crate::container::registry::RegistryError;
use crate::container::Managed;
use crate::key::ComponentRef;
use crate::provider::component::plan::InjectionPlan;
use crate::provider::component::Component;
use crate::provider::TypedProvider;

/// A [`Provider`] building a [`Component`] through constructor, field and
/// method injection, and then mapping it to the bound type `O`.
///
/// The descriptor of `C` is checked once, when the provider is created, so
/// an illegal component is reported at bind time rather than on the first
/// request.
///
/// [`Provider`]: crate::provider::Provider
pub struct InjectionProvider<C, O = C>
where
    C: Component,
    O: Managed,
{
    plan: InjectionPlan<C>,
    post_process: fn(C) -> O,
}

impl<C> InjectionProvider<C>
where
    C: Component,
{
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_post_process(convert::identity)
    }
}

impl<C, O> InjectionProvider<C, O>
where
    C: Component,
    O: Managed,
{
    /// Creates a provider whose objects are passed through `post_process`,
    /// e.g. `Arc::new` to bind a trait object.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IllegalComponent`] if the descriptor of `C`
    /// breaks an injection rule.
    pub fn with_post_process(post_process: fn(C) -> O) -> Result<Self, RegistryError> {
        let component = any::type_name::<C>();
        let plan = InjectionPlan::resolve(component, C::descriptor())
            .map_err(|reason| RegistryError::IllegalComponent { component, reason })?;
        Ok(Self { plan, post_process })
    }
}

impl<C, O> Debug for InjectionProvider<C, O>
where
    C: Component,
    O: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InjectionProvider")
            .field("component", &any::type_name::<C>())
            .field("output", &any::type_name::<O>())
            .field("dependencies", &self.plan.dependencies())
            .finish()
    }
}

impl<C, O> TypedProvider for InjectionProvider<C, O>
where
    C: Component,
    O: Managed,
{
    type Output = O;

    fn provide<I>(&self, injector: &I) -> Result<Self::Output, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        self.plan.instantiate(injector).map(self.post_process)
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.plan.dependencies().to_vec()
    }
}
