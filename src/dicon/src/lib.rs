#![allow(clippy::new_without_default)]

pub mod container;
pub mod key;
pub mod module;
pub mod provider;
pub mod scope;
mod util;

pub use dicon_derive::{component, Inject};

pub mod prelude {
    pub use crate::container::injector::{InjectionError, Lazy, TypedInjector};
    pub use crate::container::registry::{Registry, RegistryError};
    pub use crate::container::Context;
    pub use crate::key;
    pub use crate::module::{bind, Configuration, Module};
    pub use crate::provider::component::Component;
    pub use crate::{component, Inject};
}
