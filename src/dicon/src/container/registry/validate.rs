use std::collections::HashSet;

use tracing::warn;

use crate::container::registry::{ProviderEntry, ProviderMap, RegistryError};
use crate::key::Key;

/// Walks the dependency graph of a [`ProviderMap`] depth-first, starting from
/// every binding in binding order.
///
/// The walk keeps the keys currently being visited on an explicit stack. A
/// dependency found on the stack closes a cycle, reported as the stack slice
/// from its first occurrence followed by the repeated key. Keys whose whole
/// subgraph was checked are remembered and never walked again.
pub(super) struct GraphValidator<'a> {
    providers: &'a ProviderMap,
    cleared: HashSet<&'a Key>,
}

impl<'a> GraphValidator<'a> {
    pub fn new(providers: &'a ProviderMap) -> Self {
        Self {
            providers,
            cleared: HashSet::with_capacity(providers.len()),
        }
    }

    pub fn validate(mut self) -> Result<(), RegistryError> {
        let mut stack = Vec::new();
        for entry in self.providers.iter() {
            self.visit(entry, &mut stack).inspect_err(|err| {
                warn!(root = %entry.key(), "dependency graph rejected: {err}");
            })?;
        }
        Ok(())
    }

    fn visit(
        &mut self,
        entry: &'a ProviderEntry,
        stack: &mut Vec<&'a Key>,
    ) -> Result<(), RegistryError> {
        if self.cleared.contains(entry.key()) {
            return Ok(());
        }

        stack.push(entry.key());
        for reference in entry.provider().dyn_dependencies() {
            let dependency = reference.key();
            let Some(next) = self.providers.get(dependency) else {
                return Err(RegistryError::DependencyNotFound {
                    component: entry.key().clone(),
                    dependency: dependency.clone(),
                });
            };

            if let Some(start) = stack.iter().position(|key| *key == dependency) {
                let mut path: Vec<Key> = stack[start..].iter().map(|key| (*key).clone()).collect();
                path.push(dependency.clone());
                return Err(RegistryError::CyclicDependencies { path });
            }

            self.visit(next, stack)?;
        }
        stack.pop();

        self.cleared.insert(entry.key());
        Ok(())
    }
}
