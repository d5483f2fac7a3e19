use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use crate::container::injector::{InjectionError, Injector};
use crate::container::{Context, Managed, WeakContext};
use crate::key::{ComponentRef, Key};
use crate::util::any::Downcast;

/// A deferred handle to a component.
///
/// Requesting `Lazy<T>` instead of `T` delays the construction of the target
/// until [`Lazy::get`] is called. Every call to `get` goes through the
/// [`Context`] the handle came from, so the target's scope still decides
/// whether a fresh value is built. The handle does not keep that context
/// alive; once every `Context` clone is dropped, `get` fails with
/// [`InjectionError::ContextDropped`].
pub struct Lazy<T>
where
    T: Managed,
{
    context: WeakContext,
    key: Key,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Lazy<T>
where
    T: Managed,
{
    pub(crate) fn new(context: Context, key: Key) -> Self {
        Self {
            context: context.downgrade(),
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn get(&self) -> Result<T, InjectionError> {
        let Some(context) = self.context.upgrade() else {
            return Err(InjectionError::ContextDropped {
                key: self.key.clone(),
            });
        };
        let reference = ComponentRef::direct(self.key.clone());
        match context.dyn_get(&reference)? {
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(object) => Ok(*object),
                Err(_) => unreachable!("the object's type should be `T`"),
            },
            None => Err(InjectionError::NotFound {
                key: self.key.clone(),
            }),
        }
    }
}

impl<T> Clone for Lazy<T>
where
    T: Managed,
{
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for Lazy<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("Lazy").field(&self.key).finish()
    }
}
