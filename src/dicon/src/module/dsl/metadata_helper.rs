use std::marker::PhantomData;

use crate::container::registry::{Registry, RegistryError};
use crate::container::Managed;
use crate::key::{Qualifier, TypedKey};
use crate::module::dsl::closure_helper::ClosureBinding;
use crate::module::dsl::component_helper::ComponentBinding;
use crate::module::dsl::instance_helper::InstanceBinding;
use crate::module::dsl::provider_helper::ProviderBinding;
use crate::module::dsl::ToLifetime;
use crate::provider::closure::Closure;
use crate::provider::component::{Component, InjectionProvider};
use crate::provider::TypedProvider;
use crate::scope::{Scope, Transient};

/// The key and lifetime of a binding whose target is not chosen yet.
#[allow(private_bounds)]
pub struct MetadataBinding<KT, L>
where
    KT: Managed,
    L: ToLifetime,
{
    qualifier: Option<Box<dyn Qualifier>>,
    lifetime: L,
    _marker: PhantomData<fn() -> KT>,
}

#[allow(private_bounds)]
impl<KT, L> MetadataBinding<KT, L>
where
    KT: Managed,
    L: ToLifetime,
{
    pub(super) fn new(qualifier: Option<Box<dyn Qualifier>>, lifetime: L) -> Self {
        Self {
            qualifier,
            lifetime,
            _marker: PhantomData,
        }
    }

    pub(super) fn into_parts(self) -> (TypedKey<KT>, L) {
        (TypedKey::new(self.qualifier), self.lifetime)
    }

    pub fn named(self, name: &'static str) -> Self {
        self.qualified_by(name)
    }

    pub fn qualified_by<Q>(self, qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        MetadataBinding::new(Some(Box::new(qualifier)), self.lifetime)
    }

    pub fn in_scope<S>(self, scope: S) -> MetadataBinding<KT, S>
    where
        S: Scope,
    {
        MetadataBinding::new(self.qualifier, scope)
    }

    pub fn as_transient(self) -> MetadataBinding<KT, Transient> {
        MetadataBinding::new(self.qualifier, Transient)
    }

    pub fn to_instance(self, instance: KT) -> InstanceBinding<KT, L>
    where
        KT: Clone,
    {
        InstanceBinding::new(instance, self)
    }

    /// Targets the component `C`, converted into `KT` with [`From`]. This
    /// covers binding `C` itself as well as `Arc<C>`.
    pub fn to_component<C>(self) -> ComponentBinding<C, KT, L>
    where
        C: Component,
        KT: From<C>,
    {
        ComponentBinding::new(KT::from, self)
    }

    /// Targets the component `C`, converted into `KT` by `post_process`,
    /// e.g. `|c| Arc::new(c)` to bind a trait object.
    pub fn to_component_as<C>(self, post_process: fn(C) -> KT) -> ComponentBinding<C, KT, L>
    where
        C: Component,
    {
        ComponentBinding::new(post_process, self)
    }

    pub fn to_provider<P>(self, provider: P) -> ProviderBinding<KT, L, P>
    where
        P: TypedProvider<Output = KT>,
    {
        ProviderBinding::new(provider, self)
    }

    pub fn to_closure<C, D>(self, closure: C) -> ClosureBinding<KT, L, C, D>
    where
        C: Closure<D, Constructed = KT>,
        D: Send + Sync + 'static,
    {
        ClosureBinding::new(closure, self)
    }
}

impl<KT, S> MetadataBinding<KT, S>
where
    KT: Component + Clone,
    S: Scope,
{
    /// Binds the component `KT` to itself.
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, scope) = self.into_parts();
        registry.register_scoped(key, InjectionProvider::<KT>::new()?, scope)
    }
}

impl<KT> MetadataBinding<KT, Transient>
where
    KT: Component,
{
    /// Binds the component `KT` to itself.
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, _) = self.into_parts();
        registry.bind_component(key)
    }
}
