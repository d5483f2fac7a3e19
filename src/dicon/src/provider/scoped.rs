use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::container::injector::{InjectionError, TypedInjector};
use crate::key::ComponentRef;
use crate::provider::TypedProvider;

/// Constructs the inner provider's object once and hands out clones of it.
///
/// The lock is held while the object is being constructed, so concurrent
/// first requests still observe a single construction.
pub struct SingletonProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    inner: P,
    instance: Mutex<Option<P::Output>>,
}

impl<P> SingletonProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            instance: Mutex::new(None),
        }
    }
}

impl<P> Debug for SingletonProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SingletonProvider")
            .field("inner", &self.inner)
            .field("constructed", &self.instance.try_lock().map(|i| i.is_some()))
            .finish()
    }
}

impl<P> TypedProvider for SingletonProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    type Output = P::Output;

    fn provide<I>(&self, injector: &I) -> Result<Self::Output, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        let mut instance = self.instance.lock();
        if let Some(object) = instance.as_ref() {
            return Ok(object.clone());
        }

        let object = self.inner.provide(injector)?;
        *instance = Some(object.clone());
        Ok(object)
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}

/// Keeps up to `capacity` objects and hands them out round-robin.
///
/// Request `k` receives the object at position `k % capacity`, and the
/// objects are constructed on demand during the first `capacity` requests.
/// A failed construction does not advance the cursor.
pub struct PooledProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    inner: P,
    capacity: NonZeroUsize,
    pool: Mutex<Pool<P::Output>>,
}

struct Pool<T> {
    instances: Vec<T>,
    cursor: usize,
}

impl<P> PooledProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    pub fn new(inner: P, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            capacity,
            pool: Mutex::new(Pool {
                instances: Vec::with_capacity(capacity.get()),
                cursor: 0,
            }),
        }
    }
}

impl<P> Debug for PooledProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PooledProvider")
            .field("inner", &self.inner)
            .field("capacity", &self.capacity)
            .field("constructed", &self.pool.try_lock().map(|p| p.instances.len()))
            .finish()
    }
}

impl<P> TypedProvider for PooledProvider<P>
where
    P: TypedProvider<Output: Clone>,
{
    type Output = P::Output;

    fn provide<I>(&self, injector: &I) -> Result<Self::Output, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        let mut pool = self.pool.lock();
        let index = pool.cursor;
        if index == pool.instances.len() {
            let object = self.inner.provide(injector)?;
            pool.instances.push(object);
        }
        pool.cursor = (index + 1) % self.capacity;
        Ok(pool.instances[index].clone())
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}
