pub mod injector;
pub mod registry;

mod core;
mod handle;

use crate::util::any::AsAny;

pub use handle::Context;
pub(crate) use handle::WeakContext;

/// A value that can be produced and handed out by a container.
pub trait Managed: AsAny + Send + Sync + 'static {}

impl<T> Managed for T where T: AsAny + Send + Sync + 'static {}
