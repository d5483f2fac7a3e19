use std::any::{self, TypeId};
use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::container::Managed;
use crate::key::Site;
use crate::provider::component::{Arguments, Component};
use crate::util::any::Downcast;

pub(super) type Build<T> =
    Box<dyn Fn(&mut Arguments) -> Result<T, Box<dyn Error + Send + Sync>> + Send + Sync>;

pub(super) type Setter<T> = Box<dyn Fn(&mut T, Box<dyn Managed>) + Send + Sync>;

pub(super) type Invoke<T> =
    Box<dyn Fn(&mut T, &mut Arguments) -> Result<(), Box<dyn Error + Send + Sync>> + Send + Sync>;

/// The structural description of a component type `T`.
///
/// A descriptor lists the constructors of `T`, whether it is abstract, and a
/// chain of levels. Each level holds the injectable fields and the methods
/// declared by one type of the chain. Base components are embedded by value
/// and declared with [`Descriptor::extends`], which prepends all levels of the
/// base, so the chain always runs from the root base to `T` itself.
///
/// Nothing is checked while a descriptor is being built. The rules are
/// enforced once, when the component is bound, by [`InjectionProvider`].
///
/// [`InjectionProvider`]: crate::provider::component::InjectionProvider
pub struct Descriptor<T>
where
    T: Managed,
{
    is_abstract: bool,
    constructors: Vec<Constructor<T>>,
    bases: Vec<Level<T>>,
    own: Level<T>,
}

impl<T> Descriptor<T>
where
    T: Managed,
{
    pub fn new() -> Self {
        Self {
            is_abstract: false,
            constructors: Vec::new(),
            bases: Vec::new(),
            own: Level::new(),
        }
    }

    /// Marks `T` as a type that must not be instantiated.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Embeds the base component `B`, reachable through `project`.
    ///
    /// Fields and methods of `B` and of its own bases are injected before
    /// those of `T`. The constructors of `B` are not used: building the base
    /// value is the job of `T`'s constructor.
    pub fn extends<B>(mut self, project: fn(&mut T) -> &mut B) -> Self
    where
        B: Component,
    {
        let base = B::descriptor();
        for level in base.into_levels() {
            self.bases.push(level.project(project));
        }
        self
    }

    pub fn field(mut self, field: Field<T>) -> Self {
        self.own.fields.push(field);
        self
    }

    pub fn method(mut self, method: Method<T>) -> Self {
        self.own.methods.push(method);
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Returns the number of levels, counting `T` itself.
    pub fn depth(&self) -> usize {
        self.bases.len() + 1
    }

    pub(super) fn into_parts(self) -> (bool, Vec<Constructor<T>>, Vec<Level<T>>) {
        let is_abstract = self.is_abstract;
        let constructors = self.constructors;
        let mut levels = self.bases;
        levels.push(self.own);
        (is_abstract, constructors, levels)
    }

    fn into_levels(self) -> Vec<Level<T>> {
        self.into_parts().2
    }
}

impl<T> Default for Descriptor<T>
where
    T: Managed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Descriptor<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Descriptor")
            .field("type", &any::type_name::<T>())
            .field("is_abstract", &self.is_abstract)
            .field("constructors", &self.constructors)
            .field("bases", &self.bases)
            .field("own", &self.own)
            .finish()
    }
}

pub(super) struct Level<T> {
    pub(super) fields: Vec<Field<T>>,
    pub(super) methods: Vec<Method<T>>,
}

impl<T> Level<T>
where
    T: Managed,
{
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn project<S>(self, project: fn(&mut S) -> &mut T) -> Level<S>
    where
        S: Managed,
    {
        Level {
            fields: self
                .fields
                .into_iter()
                .map(|field| field.project(project))
                .collect(),
            methods: self
                .methods
                .into_iter()
                .map(|method| method.project(project))
                .collect(),
        }
    }
}

impl<T> Debug for Level<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Level")
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}

/// A way to create a `T`.
pub struct Constructor<T> {
    pub(super) injectable: bool,
    pub(super) sites: Vec<Site>,
    pub(super) build: Build<T>,
}

impl<T> Constructor<T>
where
    T: Managed,
{
    /// A constructor tagged for injection. `build` receives one argument per
    /// site, in order.
    ///
    /// The site types are not compared with what `build` takes when the
    /// component is bound. A mismatch surfaces on resolution as an
    /// [`InjectionError::InvalidArgument`] wrapped in
    /// [`InjectionError::ObjectConstruction`].
    ///
    /// [`InjectionError::InvalidArgument`]: crate::container::injector::InjectionError::InvalidArgument
    /// [`InjectionError::ObjectConstruction`]: crate::container::injector::InjectionError::ObjectConstruction
    pub fn inject<S, F>(sites: S, build: F) -> Self
    where
        S: IntoIterator<Item = Site>,
        F: Fn(&mut Arguments) -> Result<T, Box<dyn Error + Send + Sync>> + Send + Sync + 'static,
    {
        Self {
            injectable: true,
            sites: sites.into_iter().collect(),
            build: Box::new(build),
        }
    }

    /// An untagged zero-argument constructor, used when no constructor is
    /// tagged for injection.
    pub fn default<F>(build: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            injectable: false,
            sites: Vec::new(),
            build: Box::new(move |_: &mut Arguments| -> Result<T, Box<dyn Error + Send + Sync>> {
                Ok(build())
            }),
        }
    }

    pub fn is_injectable(&self) -> bool {
        self.injectable
    }
}

impl<T> Debug for Constructor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Constructor")
            .field("injectable", &self.injectable)
            .field("sites", &self.sites)
            .finish_non_exhaustive()
    }
}

/// An injectable field of `T`.
pub struct Field<T> {
    pub(super) name: &'static str,
    pub(super) site: Site,
    pub(super) value_type: TypeId,
    pub(super) value_name: &'static str,
    pub(super) read_only: bool,
    pub(super) setter: Setter<T>,
}

impl<T> Field<T>
where
    T: Managed,
{
    /// Declares the field `name` of type `V`, populated from `site` through
    /// `setter`.
    pub fn inject<V>(name: &'static str, site: Site, setter: fn(&mut T, V)) -> Self
    where
        V: Managed,
    {
        Self {
            name,
            site,
            value_type: TypeId::of::<V>(),
            value_name: any::type_name::<V>(),
            read_only: false,
            setter: Box::new(move |this: &mut T, value: Box<dyn Managed>| {
                let value = value
                    .downcast::<V>()
                    .unwrap_or_else(|_| unreachable!("site type is checked at bind time"));
                setter(this, *value);
            }),
        }
    }

    /// Marks the field as one that must not be reassigned after construction.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn project<S>(self, project: fn(&mut S) -> &mut T) -> Field<S>
    where
        S: Managed,
    {
        let setter = self.setter;
        Field {
            name: self.name,
            site: self.site,
            value_type: self.value_type,
            value_name: self.value_name,
            read_only: self.read_only,
            setter: Box::new(move |this: &mut S, value: Box<dyn Managed>| {
                setter(project(this), value)
            }),
        }
    }
}

impl<T> Debug for Field<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("site", &self.site)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

/// A method declared on `T`.
///
/// Only methods created with [`Method::inject`] are invoked. The other kinds
/// are still declared so that overriding and generic methods take part in
/// override resolution and validation.
pub struct Method<T> {
    pub(super) name: &'static str,
    pub(super) overriding: bool,
    pub(super) kind: MethodKind<T>,
}

pub(super) enum MethodKind<T> {
    Inject { sites: Vec<Site>, invoke: Invoke<T> },
    Generic,
    Plain,
}

impl<T> Method<T>
where
    T: Managed,
{
    /// A method tagged for injection, invoked after the fields of its level
    /// are set.
    ///
    /// As with [`Constructor::inject`], the site types are only checked
    /// against what `invoke` takes when the method runs.
    pub fn inject<S, F>(name: &'static str, sites: S, invoke: F) -> Self
    where
        S: IntoIterator<Item = Site>,
        F: Fn(&mut T, &mut Arguments) -> Result<(), Box<dyn Error + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            overriding: false,
            kind: MethodKind::Inject {
                sites: sites.into_iter().collect(),
                invoke: Box::new(invoke),
            },
        }
    }

    /// A method tagged for injection that has its own type parameters.
    pub fn generic(name: &'static str) -> Self {
        Self {
            name,
            overriding: false,
            kind: MethodKind::Generic,
        }
    }

    /// A method not tagged for injection.
    pub fn plain(name: &'static str) -> Self {
        Self {
            name,
            overriding: false,
            kind: MethodKind::Plain,
        }
    }

    /// Declares that this method replaces the method of the same name of a
    /// base component.
    pub fn overriding(mut self) -> Self {
        self.overriding = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn project<S>(self, project: fn(&mut S) -> &mut T) -> Method<S>
    where
        S: Managed,
    {
        let kind = match self.kind {
            MethodKind::Inject { sites, invoke } => MethodKind::Inject {
                sites,
                invoke: Box::new(move |this: &mut S, arguments: &mut Arguments| {
                    invoke(project(this), arguments)
                }),
            },
            MethodKind::Generic => MethodKind::Generic,
            MethodKind::Plain => MethodKind::Plain,
        };
        Method {
            name: self.name,
            overriding: self.overriding,
            kind,
        }
    }
}

impl<T> Debug for Method<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let kind = match &self.kind {
            MethodKind::Inject { .. } => "Inject",
            MethodKind::Generic => "Generic",
            MethodKind::Plain => "Plain",
        };
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("overriding", &self.overriding)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct Base {
        log: Vec<&'static str>,
        level: u8,
    }

    impl Component for Base {
        fn descriptor() -> Descriptor<Self> {
            Descriptor::new()
                .constructor(Constructor::default(Base::default))
                .field(Field::inject(
                    "level",
                    Site::of::<u8>(),
                    |this: &mut Self, level: u8| this.level = level,
                ))
                .method(Method::inject("init", [], |this: &mut Self, _| {
                    this.log.push("base");
                    Ok(())
                }))
        }
    }

    #[derive(Default)]
    struct Derived {
        base: Base,
        name: Arc<String>,
    }

    impl Component for Derived {
        fn descriptor() -> Descriptor<Self> {
            Descriptor::new()
                .extends::<Base>(|this: &mut Self| &mut this.base)
                .field(Field::inject(
                    "name",
                    Site::of::<Arc<String>>(),
                    |this: &mut Self, name: Arc<String>| this.name = name,
                ))
                .method(Method::plain("init").overriding())
        }
    }

    struct Leaf {
        derived: Derived,
    }

    impl Component for Leaf {
        fn descriptor() -> Descriptor<Self> {
            Descriptor::new().extends::<Derived>(|this: &mut Self| &mut this.derived)
        }
    }

    #[test]
    fn descriptor_levels_succeeds() {
        let descriptor = Leaf::descriptor();
        assert_eq!(descriptor.depth(), 3);

        let (is_abstract, constructors, levels) = descriptor.into_parts();
        assert!(!is_abstract);
        assert!(constructors.is_empty());
        assert_eq!(levels[0].fields[0].name(), "level");
        assert_eq!(levels[1].fields[0].name(), "name");
        assert!(levels[1].methods[0].overriding);
        assert!(levels[2].fields.is_empty());
    }

    #[test]
    fn descriptor_projection_succeeds() {
        let (_, _, mut levels) = Derived::descriptor().into_parts();
        let mut derived = Derived::default();

        let field = levels[0].fields.remove(0);
        (field.setter)(&mut derived, Box::new(5u8));
        assert_eq!(derived.base.level, 5);

        let MethodKind::Inject { invoke, .. } = &levels[0].methods[0].kind else {
            panic!("base method should be injectable");
        };
        let mut arguments = Arguments::new("Derived", Vec::new());
        invoke(&mut derived, &mut arguments).unwrap();
        assert_eq!(derived.base.log, vec!["base"]);
    }

    #[test]
    fn constructor_default_succeeds() {
        let constructor = Constructor::default(|| 3u8);
        let mut arguments = Arguments::new("u8", Vec::new());

        assert!(!constructor.is_injectable());
        assert_eq!((constructor.build)(&mut arguments).unwrap(), 3);
    }
}
