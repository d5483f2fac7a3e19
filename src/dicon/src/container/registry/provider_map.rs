use std::collections::HashMap;

use crate::key::Key;
use crate::provider::Provider;
use crate::scope::Lifetime;

/// The bindings of a registry, keyed by [`Key`] and kept in binding order.
#[derive(Debug, Default)]
pub struct ProviderMap {
    entries: HashMap<Key, ProviderEntry>,
    order: Vec<Key>,
}

impl ProviderMap {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Inserts `entry` unless its key is already bound, in which case the
    /// entry is handed back.
    pub fn insert(&mut self, entry: ProviderEntry) -> Result<(), ProviderEntry> {
        if self.entries.contains_key(entry.key()) {
            return Err(entry);
        }
        self.order.push(entry.key().clone());
        self.entries.insert(entry.key().clone(), entry);
        Ok(())
    }

    pub fn get(&self, key: &Key) -> Option<&ProviderEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the entries in binding order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderEntry> + '_ {
        self.order.iter().filter_map(|key| self.entries.get(key))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug)]
pub struct ProviderEntry {
    key: Key,
    provider: Box<dyn Provider>,
    lifetime: Lifetime,
}

impl ProviderEntry {
    pub fn new(key: Key, provider: Box<dyn Provider>, lifetime: Lifetime) -> Self {
        Self {
            key,
            provider,
            lifetime,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}
