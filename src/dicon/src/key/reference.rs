use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

use crate::container::injector::Lazy;
use crate::container::{Context, Managed};
use crate::key::{Key, TypedKey};

/// The generic container shape a dependency is requested through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// The dependency is delivered as a [`Lazy<T>`] handle and only
    /// constructed when [`Lazy::get`] is called.
    Lazy,
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Lazy => write!(f, "Lazy"),
        }
    }
}

/// A [`Shape`] together with the knowledge of how to wrap a resolved key into
/// the container value.
#[derive(Clone, Copy)]
pub struct ContainerKind {
    shape: Shape,
    wrap: fn(Context, Key) -> Box<dyn Managed>,
}

impl ContainerKind {
    pub fn lazy<T>() -> Self
    where
        T: Managed,
    {
        Self {
            shape: Shape::Lazy,
            wrap: wrap_lazy::<T>,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub(crate) fn wrap(&self, context: Context, key: Key) -> Box<dyn Managed> {
        (self.wrap)(context, key)
    }
}

impl Debug for ContainerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContainerKind")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

fn wrap_lazy<T: Managed>(context: Context, key: Key) -> Box<dyn Managed> {
    Box::new(Lazy::<T>::new(context, key))
}

/// A requested reference to a [`Key`], possibly wrapped in a container shape.
///
/// Equality and hashing are structural over the key's type, its qualifier
/// and the container shape, so a lazy and a direct reference to the same key
/// are different references even though they depend on the same binding.
#[derive(Clone)]
pub struct ComponentRef {
    key: Key,
    container: Option<ContainerKind>,
}

impl ComponentRef {
    pub fn direct(key: Key) -> Self {
        Self {
            key,
            container: None,
        }
    }

    pub fn lazy<T>(key: TypedKey<T>) -> Self
    where
        T: Managed,
    {
        Self {
            key: key.into_key(),
            container: Some(ContainerKind::lazy::<T>()),
        }
    }

    pub(crate) fn with_container(key: Key, container: Option<ContainerKind>) -> Self {
        Self { key, container }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn container(&self) -> Option<&ContainerKind> {
        self.container.as_ref()
    }

    pub fn shape(&self) -> Option<Shape> {
        self.container.map(|kind| kind.shape())
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }
}

impl<T> From<TypedKey<T>> for ComponentRef
where
    T: Managed,
{
    fn from(key: TypedKey<T>) -> Self {
        Self::direct(key.into_key())
    }
}

impl PartialEq for ComponentRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.shape() == other.shape()
    }
}

impl Eq for ComponentRef {}

impl Hash for ComponentRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.shape().hash(state);
    }
}

impl Debug for ComponentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for ComponentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.shape() {
            Some(shape) => write!(f, "{shape}<{}>", self.key),
            None => write!(f, "{}", self.key),
        }
    }
}
