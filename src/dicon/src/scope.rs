use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::num::NonZeroUsize;

use crate::provider::scoped::{PooledProvider, SingletonProvider};
use crate::provider::{Provider, TypedProvider};

/// A policy deciding how many distinct values a binding hands out.
///
/// A [`Scope`] decorates the provider of a binding. Only providers whose
/// output is [`Clone`] can be scoped, since a scoped value is handed out to
/// more than one requester. Bindings without a scope use [`Transient`] and
/// are built fresh on every request.
pub trait Scope: Copy + Debug + Display + Send + Sync + 'static {
    fn lifetime(self) -> Lifetime;

    /// Wraps `provider` so that it follows this scope's policy.
    fn decorate<P>(self, provider: P) -> Box<dyn Provider>
    where
        P: TypedProvider<Output: Clone>;
}

/// One value per context. The first request constructs it and every later
/// request receives a clone of it.
///
/// Identity is only shared when the output is a handle such as `Arc<T>`; a
/// plain `Clone` value is copied on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Singleton;

impl Display for Singleton {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Singleton")
    }
}

impl Scope for Singleton {
    fn lifetime(self) -> Lifetime {
        Lifetime::Singleton
    }

    fn decorate<P>(self, provider: P) -> Box<dyn Provider>
    where
        P: TypedProvider<Output: Clone>,
    {
        Box::new(SingletonProvider::new(provider))
    }
}

/// A fixed-size pool of values handed out round-robin.
///
/// The first `capacity` requests each construct a new value; request `k`
/// (counting from zero) then receives the value at position `k % capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pooled {
    capacity: NonZeroUsize,
}

impl Pooled {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl Display for Pooled {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Pooled({})", self.capacity)
    }
}

impl Scope for Pooled {
    fn lifetime(self) -> Lifetime {
        Lifetime::Pooled(self.capacity)
    }

    fn decorate<P>(self, provider: P) -> Box<dyn Provider>
    where
        P: TypedProvider<Output: Clone>,
    {
        Box::new(PooledProvider::new(provider, self.capacity))
    }
}

/// The absence of a scope: a new value on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transient;

/// How a registered binding shares its values, as recorded in the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    Transient,
    Singleton,
    Pooled(NonZeroUsize),
}

impl Display for Lifetime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Transient => write!(f, "Transient"),
            Self::Singleton => write!(f, "Singleton"),
            Self::Pooled(capacity) => write!(f, "Pooled({capacity})"),
        }
    }
}
