mod reference;
mod site;
mod typed;

use std::any::{self, TypeId};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

use crate::container::Managed;
use crate::util::any::AsAny;
use crate::util::hash::DynHash;

pub use reference::{ComponentRef, ContainerKind, Shape};
pub use site::Site;
pub use typed::TypedKey;

/// A tag disambiguating several bindings of the same type.
///
/// Any `Clone + Debug + Eq + Hash + Send + Sync + 'static` value is a
/// [`Qualifier`]. Two qualifiers are equal only if they have the same concrete
/// type and compare equal as that type, so `"main"` and `String::from("main")`
/// are different qualifiers.
pub trait Qualifier: Debug + AsAny + DynHash + Send + Sync + 'static {
    fn dyn_clone(&self) -> Box<dyn Qualifier>;
}

impl<T> Qualifier for T
where
    T: Clone + Debug + Eq + Hash + Send + Sync + 'static,
{
    fn dyn_clone(&self) -> Box<dyn Qualifier> {
        Box::new(self.clone())
    }
}

impl PartialEq for dyn Qualifier {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

impl Eq for dyn Qualifier {}

impl Hash for dyn Qualifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dyn_hash(state);
    }
}

/// The identity of a bindable component: a type plus an optional qualifier.
pub struct Key {
    target: TypeId,
    target_name: &'static str,
    qualifier: Option<Box<dyn Qualifier>>,
}

impl Key {
    pub(crate) fn new<T: Managed>(qualifier: Option<Box<dyn Qualifier>>) -> Self {
        Self {
            target: TypeId::of::<T>(),
            target_name: any::type_name::<T>(),
            qualifier,
        }
    }

    pub(crate) fn with_qualifier(mut self, qualifier: Box<dyn Qualifier>) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn target(&self) -> TypeId {
        self.target
    }

    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    pub fn qualifier(&self) -> Option<&dyn Qualifier> {
        self.qualifier.as_deref()
    }

    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }
}

impl Clone for Key {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            target_name: self.target_name,
            qualifier: self.qualifier.as_deref().map(Qualifier::dyn_clone),
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.qualifier() == other.qualifier()
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
        self.qualifier().hash(state);
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.qualifier() {
            Some(qualifier) => write!(f, "{}@{:?}", self.target_name, qualifier),
            None => write!(f, "{}", self.target_name),
        }
    }
}

/// Creates a key of type `T` without a qualifier.
pub fn of<T>() -> TypedKey<T>
where
    T: Managed,
{
    TypedKey::new(None)
}

/// Creates a key of type `T` qualified by a name.
pub fn named<T>(name: &'static str) -> TypedKey<T>
where
    T: Managed,
{
    TypedKey::new(Some(Box::new(name)))
}

/// Creates a key of type `T` qualified by an arbitrary [`Qualifier`].
pub fn qualified<T, Q>(qualifier: Q) -> TypedKey<T>
where
    T: Managed,
    Q: Qualifier,
{
    TypedKey::new(Some(Box::new(qualifier)))
}
