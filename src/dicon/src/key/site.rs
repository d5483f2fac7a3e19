use std::any::{self, TypeId};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::container::injector::Lazy;
use crate::container::Managed;
use crate::key::{ComponentRef, ContainerKind, Key, Qualifier};

/// A declared dependency site: a constructor or method parameter, or a field.
///
/// A site records the value type it expects, the container shape it is
/// requested through and every qualifier annotation found on it. It becomes a
/// [`ComponentRef`] once the descriptor it belongs to is resolved; a site
/// carrying more than one qualifier cannot be turned into a reference.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use dicon::key::Site;
/// let plain = Site::of::<Arc<String>>();
/// let named = Site::of::<u16>().named("port");
/// let lazy = Site::lazy::<Arc<String>>().named("greeting");
/// assert_eq!(named.qualifier_count(), 1);
/// assert!(lazy.is_container());
/// # let _ = plain;
/// ```
pub struct Site {
    key: Key,
    container: Option<ContainerKind>,
    qualifiers: Vec<Box<dyn Qualifier>>,
    value_type: TypeId,
    value_name: &'static str,
}

impl Site {
    /// Declares a site expecting a `T` directly.
    pub fn of<T>() -> Self
    where
        T: Managed,
    {
        Self {
            key: Key::new::<T>(None),
            container: None,
            qualifiers: Vec::new(),
            value_type: TypeId::of::<T>(),
            value_name: any::type_name::<T>(),
        }
    }

    /// Declares a site expecting a [`Lazy<T>`], which unwraps to a dependency
    /// on `T`.
    pub fn lazy<T>() -> Self
    where
        T: Managed,
    {
        Self {
            key: Key::new::<T>(None),
            container: Some(ContainerKind::lazy::<T>()),
            qualifiers: Vec::new(),
            value_type: TypeId::of::<Lazy<T>>(),
            value_name: any::type_name::<Lazy<T>>(),
        }
    }

    /// Adds a name qualifier annotation.
    pub fn named(self, name: &'static str) -> Self {
        self.qualified(name)
    }

    /// Adds a qualifier annotation.
    pub fn qualified<Q>(mut self, qualifier: Q) -> Self
    where
        Q: Qualifier,
    {
        self.qualifiers.push(Box::new(qualifier));
        self
    }

    pub fn qualifier_count(&self) -> usize {
        self.qualifiers.len()
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    /// The type of the value delivered to the site, i.e. `Lazy<T>` for lazy
    /// sites.
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub fn value_name(&self) -> &'static str {
        self.value_name
    }

    /// Builds the reference this site requests. Fails with the number of
    /// qualifiers found if there is more than one.
    pub(crate) fn reference(&self) -> Result<ComponentRef, usize> {
        let key = match self.qualifiers.as_slice() {
            [] => self.key.clone(),
            [qualifier] => self.key.clone().with_qualifier((**qualifier).dyn_clone()),
            qualifiers => return Err(qualifiers.len()),
        };
        Ok(ComponentRef::with_container(key, self.container))
    }
}

impl Debug for Site {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Site")
            .field("key", &self.key)
            .field("container", &self.container)
            .field("qualifiers", &self.qualifiers)
            .finish_non_exhaustive()
    }
}
