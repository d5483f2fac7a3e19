use tracing::trace;

use crate::container::injector::InjectionError;
use crate::container::registry::ProviderMap;
use crate::container::{Context, Managed};
use crate::key::{ComponentRef, Key};

pub struct ContextCore {
    providers: ProviderMap,
}

impl ContextCore {
    pub fn new(providers: ProviderMap) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &ProviderMap {
        &self.providers
    }

    pub fn get_object(
        &self,
        handle: &Context,
        reference: &ComponentRef,
    ) -> Result<Option<Box<dyn Managed>>, InjectionError> {
        let key = reference.key();
        let Some(entry) = self.providers.get(key) else {
            trace!(%reference, "requested key is not bound");
            return Ok(None);
        };

        match reference.container() {
            Some(kind) => {
                trace!(%reference, "handing out a container value");
                Ok(Some(kind.wrap(handle.clone(), key.clone())))
            }
            None => {
                trace!(%key, lifetime = %entry.lifetime(), "providing object");
                entry.provider().dyn_provide(handle).map(Some)
            }
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.providers.get(key).is_some()
    }
}
