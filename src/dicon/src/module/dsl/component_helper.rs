use crate::container::registry::{Registry, RegistryError};
use crate::container::Managed;
use crate::key::Qualifier;
use crate::module::dsl::metadata_helper::MetadataBinding;
use crate::module::dsl::ToLifetime;
use crate::provider::component::{Component, InjectionProvider};
use crate::scope::{Scope, Transient};

#[allow(private_bounds)]
pub struct ComponentBinding<C, KT, L>
where
    C: Component,
    KT: Managed,
    L: ToLifetime,
{
    post_process: fn(C) -> KT,
    metadata: MetadataBinding<KT, L>,
}

#[allow(private_bounds)]
impl<C, KT, L> ComponentBinding<C, KT, L>
where
    C: Component,
    KT: Managed,
    L: ToLifetime,
{
    pub(super) fn new(post_process: fn(C) -> KT, metadata: MetadataBinding<KT, L>) -> Self {
        Self {
            post_process,
            metadata,
        }
    }

    pub fn named(self, name: &'static str) -> Self {
        ComponentBinding::new(self.post_process, self.metadata.named(name))
    }

    pub fn qualified_by<Q>(self, qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        ComponentBinding::new(self.post_process, self.metadata.qualified_by(qualifier))
    }

    pub fn in_scope<S>(self, scope: S) -> ComponentBinding<C, KT, S>
    where
        S: Scope,
    {
        ComponentBinding::new(self.post_process, self.metadata.in_scope(scope))
    }

    pub fn as_transient(self) -> ComponentBinding<C, KT, Transient> {
        ComponentBinding::new(self.post_process, self.metadata.as_transient())
    }
}

impl<C, KT, S> ComponentBinding<C, KT, S>
where
    C: Component,
    KT: Managed + Clone,
    S: Scope,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, scope) = self.metadata.into_parts();
        let provider = InjectionProvider::with_post_process(self.post_process)?;
        registry.register_scoped(key, provider, scope)
    }
}

impl<C, KT> ComponentBinding<C, KT, Transient>
where
    C: Component,
    KT: Managed,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, _) = self.metadata.into_parts();
        registry.bind_component_as(key, self.post_process)
    }
}
