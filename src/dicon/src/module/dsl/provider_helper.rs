use crate::container::registry::{Registry, RegistryError};
use crate::container::Managed;
use crate::key::Qualifier;
use crate::module::dsl::metadata_helper::MetadataBinding;
use crate::module::dsl::ToLifetime;
use crate::provider::TypedProvider;
use crate::scope::{Scope, Transient};

#[allow(private_bounds)]
pub struct ProviderBinding<KT, L, P>
where
    KT: Managed,
    L: ToLifetime,
    P: TypedProvider<Output = KT>,
{
    provider: P,
    metadata: MetadataBinding<KT, L>,
}

#[allow(private_bounds)]
impl<KT, L, P> ProviderBinding<KT, L, P>
where
    KT: Managed,
    L: ToLifetime,
    P: TypedProvider<Output = KT>,
{
    pub(super) fn new(provider: P, metadata: MetadataBinding<KT, L>) -> Self {
        Self { provider, metadata }
    }

    pub fn named(self, name: &'static str) -> Self {
        ProviderBinding::new(self.provider, self.metadata.named(name))
    }

    pub fn qualified_by<Q>(self, qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        ProviderBinding::new(self.provider, self.metadata.qualified_by(qualifier))
    }

    pub fn in_scope<S>(self, scope: S) -> ProviderBinding<KT, S, P>
    where
        S: Scope,
    {
        ProviderBinding::new(self.provider, self.metadata.in_scope(scope))
    }

    pub fn as_transient(self) -> ProviderBinding<KT, Transient, P> {
        ProviderBinding::new(self.provider, self.metadata.as_transient())
    }
}

impl<KT, S, P> ProviderBinding<KT, S, P>
where
    KT: Managed + Clone,
    S: Scope,
    P: TypedProvider<Output = KT>,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, scope) = self.metadata.into_parts();
        registry.register_scoped(key, self.provider, scope)
    }
}

impl<KT, P> ProviderBinding<KT, Transient, P>
where
    KT: Managed,
    P: TypedProvider<Output = KT>,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, _) = self.metadata.into_parts();
        registry.register(key, self.provider)
    }
}
