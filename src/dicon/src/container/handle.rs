use std::sync::{Arc, Weak};

use crate::container::core::ContextCore;
use crate::container::injector::{InjectionError, Injector};
use crate::container::registry::{ProviderMap, Registry, RegistryError};
use crate::container::Managed;
use crate::key::{ComponentRef, Key};
use crate::module::Module;
use crate::scope::Lifetime;

/// A frozen, validated set of bindings from which components are resolved.
///
/// `Context` is a cheap handle; clones share the same bindings and the same
/// scoped instances. Resolution goes through [`TypedInjector`], so lookups
/// of an unbound key return `Ok(None)` rather than an error.
///
/// [`TypedInjector`]: crate::container::injector::TypedInjector
#[derive(Clone)]
pub struct Context {
    core: Arc<ContextCore>,
}

impl Context {
    pub(crate) fn new(providers: ProviderMap) -> Self {
        Self {
            core: Arc::new(ContextCore::new(providers)),
        }
    }

    /// Builds a context from a single module.
    pub fn init<M>(module: M) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        let mut registry = Registry::new();
        registry.install(&module)?;
        registry.freeze()
    }

    pub(crate) fn downgrade(&self) -> WeakContext {
        WeakContext {
            core: Arc::downgrade(&self.core),
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.core.contains(key)
    }

    /// Iterates over the bound keys in binding order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.core.providers().iter().map(|entry| entry.key())
    }

    pub fn lifetime(&self, key: &Key) -> Option<Lifetime> {
        self.core.providers().get(key).map(|entry| entry.lifetime())
    }

    pub fn len(&self) -> usize {
        self.core.providers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`Context`] reference that does not keep the bindings alive.
#[derive(Clone)]
pub(crate) struct WeakContext {
    core: Weak<ContextCore>,
}

impl WeakContext {
    pub fn upgrade(&self) -> Option<Context> {
        self.core.upgrade().map(|core| Context { core })
    }
}

impl Injector for Context {
    fn dyn_get(
        &self,
        reference: &ComponentRef,
    ) -> Result<Option<Box<dyn Managed>>, InjectionError> {
        self.core.get_object(self, reference)
    }
}
