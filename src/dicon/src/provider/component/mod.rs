mod arguments;
mod descriptor;
mod plan;
mod wrapper;

use crate::container::Managed;

pub use arguments::Arguments;
pub use descriptor::{Constructor, Descriptor, Field, Method};
pub use wrapper::InjectionProvider;

/// A type whose construction is described structurally, so that a container
/// can build it through constructor, field and method injection.
///
/// Usually, you don't need to implement the [`Component`] trait manually for
/// your components, because the [`component`] macro helps with this. In case
/// that you really want to write the implementation in your own, take a look
/// at the following code snippet:
///
/// ```rust
/// # use std::sync::Arc;
/// # use dicon::key::Site;
/// # use dicon::provider::component::{Component, Constructor, Descriptor, Field};
/// #
/// struct Greeter {
///     prefix: Arc<String>,
///     volume: u8,
/// }
///
/// impl Component for Greeter {
///     fn descriptor() -> Descriptor<Self> {
///         Descriptor::new()
///             .constructor(Constructor::inject([Site::of::<Arc<String>>()], |args| {
///                 Ok(Self {
///                     prefix: args.take()?,
///                     volume: 0,
///                 })
///             }))
///             .field(Field::inject(
///                 "volume",
///                 Site::of::<u8>().named("volume"),
///                 |this: &mut Self, volume: u8| this.volume = volume,
///             ))
///     }
/// }
/// ```
///
/// You don't need to use functions in [`Component`] directly either. The most
/// recommended way is to use `to_component()` in the [`dsl`]. Or wrap your
/// [`Component`] in an [`InjectionProvider`] if you need low-level control.
///
/// [`component`]: crate::component
/// [`dsl`]: crate::module::dsl
pub trait Component: Managed + Sized {
    /// Describes how to construct and populate `Self`.
    fn descriptor() -> Descriptor<Self>;
}

/// The field half of a [`Descriptor`], generated by `#[derive(Inject)]`.
///
/// The [`component`] macro starts every descriptor from
/// `<Self as Fields>::fields(Descriptor::new())`, so types using it must also
/// derive [`Inject`].
///
/// [`component`]: crate::component
/// [`Inject`]: crate::Inject
pub trait Fields: Managed + Sized {
    fn fields(descriptor: Descriptor<Self>) -> Descriptor<Self>;
}
