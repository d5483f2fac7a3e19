use crate::container::registry::{Registry, RegistryError};
use crate::container::Managed;
use crate::key::Qualifier;
use crate::module::dsl::metadata_helper::MetadataBinding;
use crate::module::dsl::ToLifetime;
use crate::provider::instance::InstanceProvider;
use crate::scope::{Scope, Transient};

#[allow(private_bounds)]
pub struct InstanceBinding<KT, L>
where
    KT: Managed + Clone,
    L: ToLifetime,
{
    instance: KT,
    metadata: MetadataBinding<KT, L>,
}

#[allow(private_bounds)]
impl<KT, L> InstanceBinding<KT, L>
where
    KT: Managed + Clone,
    L: ToLifetime,
{
    pub(super) fn new(instance: KT, metadata: MetadataBinding<KT, L>) -> Self {
        Self { instance, metadata }
    }

    pub fn named(self, name: &'static str) -> Self {
        InstanceBinding::new(self.instance, self.metadata.named(name))
    }

    pub fn qualified_by<Q>(self, qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        InstanceBinding::new(self.instance, self.metadata.qualified_by(qualifier))
    }

    pub fn in_scope<S>(self, scope: S) -> InstanceBinding<KT, S>
    where
        S: Scope,
    {
        InstanceBinding::new(self.instance, self.metadata.in_scope(scope))
    }

    pub fn as_transient(self) -> InstanceBinding<KT, Transient> {
        InstanceBinding::new(self.instance, self.metadata.as_transient())
    }
}

impl<KT, S> InstanceBinding<KT, S>
where
    KT: Managed + Clone,
    S: Scope,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, scope) = self.metadata.into_parts();
        registry.register_scoped(key, InstanceProvider::new(self.instance), scope)
    }
}

impl<KT> InstanceBinding<KT, Transient>
where
    KT: Managed + Clone,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, _) = self.metadata.into_parts();
        registry.bind_instance(key, self.instance)
    }
}
