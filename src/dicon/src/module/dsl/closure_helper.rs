use std::marker::PhantomData;

use crate::container::registry::{Registry, RegistryError};
use crate::container::Managed;
use crate::key::Qualifier;
use crate::module::dsl::metadata_helper::MetadataBinding;
use crate::module::dsl::ToLifetime;
use crate::provider::closure::{Closure, ClosureProvider};
use crate::scope::{Scope, Transient};

#[allow(private_bounds)]
pub struct ClosureBinding<KT, L, C, D>
where
    KT: Managed,
    L: ToLifetime,
    C: Closure<D, Constructed = KT>,
    D: Send + Sync + 'static,
{
    closure: C,
    metadata: MetadataBinding<KT, L>,
    _marker: PhantomData<fn() -> D>,
}

#[allow(private_bounds)]
impl<KT, L, C, D> ClosureBinding<KT, L, C, D>
where
    KT: Managed,
    L: ToLifetime,
    C: Closure<D, Constructed = KT>,
    D: Send + Sync + 'static,
{
    pub(super) fn new(closure: C, metadata: MetadataBinding<KT, L>) -> Self {
        Self {
            closure,
            metadata,
            _marker: PhantomData,
        }
    }

    pub fn named(self, name: &'static str) -> Self {
        ClosureBinding::new(self.closure, self.metadata.named(name))
    }

    pub fn qualified_by<Q>(self, qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        ClosureBinding::new(self.closure, self.metadata.qualified_by(qualifier))
    }

    pub fn in_scope<S>(self, scope: S) -> ClosureBinding<KT, S, C, D>
    where
        S: Scope,
    {
        ClosureBinding::new(self.closure, self.metadata.in_scope(scope))
    }

    pub fn as_transient(self) -> ClosureBinding<KT, Transient, C, D> {
        ClosureBinding::new(self.closure, self.metadata.as_transient())
    }
}

impl<KT, S, C, D> ClosureBinding<KT, S, C, D>
where
    KT: Managed + Clone,
    S: Scope,
    C: Closure<D, Constructed = KT>,
    D: Send + Sync + 'static,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, scope) = self.metadata.into_parts();
        registry.register_scoped(key, ClosureProvider::new(self.closure), scope)
    }
}

impl<KT, C, D> ClosureBinding<KT, Transient, C, D>
where
    KT: Managed,
    C: Closure<D, Constructed = KT>,
    D: Send + Sync + 'static,
{
    pub fn set_on(self, registry: &mut Registry) -> Result<(), RegistryError> {
        let (key, _) = self.metadata.into_parts();
        registry.register(key, ClosureProvider::new(self.closure))
    }
}
