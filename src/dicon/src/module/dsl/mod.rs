//! A fluent way to declare bindings inside a [`Module`].
//!
//! ```rust
//! # use std::error::Error;
//! # use std::sync::Arc;
//! # use dicon::prelude::*;
//! # use dicon::scope::Singleton;
//! struct ServerModule;
//!
//! impl Module for ServerModule {
//!     fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
//!         bind::<u16>().named("port").to_instance(8080).set_on(registry)?;
//!         bind::<Arc<String>>()
//!             .to_closure(|port: u16| {
//!                 Ok::<_, Box<dyn Error + Send + Sync>>(Arc::new(format!("0.0.0.0:{port}")))
//!             })
//!             .in_scope(Singleton)
//!             .set_on(registry)?;
//!         bind::<u16>().to_instance(80).set_on(registry)?;
//!         Ok(())
//!     }
//! }
//! # Context::init(ServerModule).unwrap();
//! ```
//!
//! [`Module`]: crate::module::Module

mod closure_helper;
mod component_helper;
mod instance_helper;
mod metadata_helper;
mod provider_helper;

use crate::container::Managed;
use crate::scope::{Scope, Transient};

pub use closure_helper::ClosureBinding;
pub use component_helper::ComponentBinding;
pub use instance_helper::InstanceBinding;
pub use metadata_helper::MetadataBinding;
pub use provider_helper::ProviderBinding;

/// Either a [`Scope`] or [`Transient`].
#[allow(private_bounds)]
pub trait ToLifetime: Sealed + Send + Sync + 'static {}

impl<S: Scope> ToLifetime for S {}

impl ToLifetime for Transient {}

trait Sealed {}

impl<S: Scope> Sealed for S {}

impl Sealed for Transient {}

/// Starts a binding for the type `KT`.
pub fn bind<KT>() -> MetadataBinding<KT, Transient>
where
    KT: Managed,
{
    MetadataBinding::new(None, Transient)
}
