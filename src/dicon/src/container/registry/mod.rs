mod provider_map;
mod validate;

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::container::{Context, Managed};
use crate::key::{Key, TypedKey};
use crate::module::Module;
use crate::provider::component::{Component, InjectionProvider};
use crate::provider::instance::InstanceProvider;
use crate::provider::{Provider, TypedProvider};
use crate::scope::{Lifetime, Scope};

pub(crate) use provider_map::{ProviderEntry, ProviderMap};
use validate::GraphValidator;

/// The mutable set of bindings a [`Context`] is built from.
///
/// Every binding maps a [`Key`] to a provider. Binding a component checks
/// its descriptor right away; the dependency graph as a whole is checked
/// by [`Registry::freeze`], which consumes the registry.
#[derive(Debug, Default)]
pub struct Registry {
    providers: ProviderMap,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            providers: ProviderMap::new(),
        }
    }

    /// Binds `key` to a transient provider.
    pub fn register<P>(&mut self, key: TypedKey<P::Output>, provider: P) -> Result<(), RegistryError>
    where
        P: TypedProvider,
    {
        self.dyn_register(key.into_key(), Box::new(provider), Lifetime::Transient)
    }

    /// Binds `key` to `provider` decorated by `scope`.
    pub fn register_scoped<P, S>(
        &mut self,
        key: TypedKey<P::Output>,
        provider: P,
        scope: S,
    ) -> Result<(), RegistryError>
    where
        P: TypedProvider<Output: Clone>,
        S: Scope,
    {
        self.dyn_register(key.into_key(), scope.decorate(provider), scope.lifetime())
    }

    pub fn bind_instance<T>(&mut self, key: TypedKey<T>, instance: T) -> Result<(), RegistryError>
    where
        T: Managed + Clone,
    {
        self.register(key, InstanceProvider::new(instance))
    }

    pub fn bind_component<C>(&mut self, key: TypedKey<C>) -> Result<(), RegistryError>
    where
        C: Component,
    {
        self.register(key, InjectionProvider::<C>::new()?)
    }

    /// Binds `key` to the component `C`, mapped to `T` by `post_process`.
    pub fn bind_component_as<C, T>(
        &mut self,
        key: TypedKey<T>,
        post_process: fn(C) -> T,
    ) -> Result<(), RegistryError>
    where
        C: Component,
        T: Managed,
    {
        self.register(key, InjectionProvider::with_post_process(post_process)?)
    }

    /// Lets `module` add its bindings.
    ///
    /// # Errors
    ///
    /// A [`RegistryError`] raised inside the module is returned as is. Any
    /// other error is wrapped in [`RegistryError::ModuleInner`].
    pub fn install<M>(&mut self, module: &M) -> Result<(), RegistryError>
    where
        M: Module + ?Sized,
    {
        debug!(module = module.name(), "installing module");
        module
            .configure(self)
            .map_err(|err| match err.downcast::<RegistryError>() {
                Ok(err) => *err,
                Err(source) => RegistryError::ModuleInner {
                    module: module.name(),
                    source,
                },
            })
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.providers.contains(key)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Validates the dependency graph and turns the registry into a
    /// [`Context`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DependencyNotFound`] if a provider depends on
    /// an unbound key, or [`RegistryError::CyclicDependencies`] if the graph
    /// has a cycle.
    pub fn freeze(self) -> Result<Context, RegistryError> {
        GraphValidator::new(&self.providers).validate()?;
        info!(bindings = self.providers.len(), "registry frozen");
        Ok(Context::new(self.providers))
    }

    fn dyn_register(
        &mut self,
        key: Key,
        provider: Box<dyn Provider>,
        lifetime: Lifetime,
    ) -> Result<(), RegistryError> {
        debug!(%key, %lifetime, "binding registered");
        self.providers
            .insert(ProviderEntry::new(key, provider, lifetime))
            .map_err(|entry| {
                warn!(key = %entry.key(), "key is bound twice");
                RegistryError::KeyDuplicated {
                    key: entry.key().clone(),
                }
            })
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display("component {component} can't be injected: {reason}"))]
    #[non_exhaustive]
    IllegalComponent {
        component: &'static str,
        reason: IllegalReason,
    },
    #[snafu(display("the key {key} already exists in the registry"))]
    #[non_exhaustive]
    KeyDuplicated { key: Key },
    #[snafu(display("{component} depends on {dependency}, which is not bound"))]
    #[non_exhaustive]
    DependencyNotFound { component: Key, dependency: Key },
    #[snafu(display("cyclic dependencies: {}", PathDisplayer::new(path)))]
    #[non_exhaustive]
    CyclicDependencies { path: Vec<Key> },
    #[snafu(display("module {module} fails to setup the configuration"))]
    #[non_exhaustive]
    ModuleInner {
        module: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
}

/// Why a component was rejected when it was bound.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IllegalReason {
    AbstractComponent,
    AmbiguousConstructor {
        count: usize,
    },
    NoUsableConstructor,
    FinalInjectedField {
        field: &'static str,
    },
    GenericInjectMethod {
        method: &'static str,
    },
    MultipleQualifiers {
        site: String,
        count: usize,
    },
    MismatchedSite {
        site: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl Display for IllegalReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::AbstractComponent => write!(f, "the type is abstract"),
            Self::AmbiguousConstructor { count } => {
                write!(f, "{count} constructors are tagged for injection")
            }
            Self::NoUsableConstructor => write!(f, "no constructor can be used"),
            Self::FinalInjectedField { field } => {
                write!(f, "the read-only field `{field}` is tagged for injection")
            }
            Self::GenericInjectMethod { method } => {
                write!(f, "the generic method `{method}` is tagged for injection")
            }
            Self::MultipleQualifiers { site, count } => {
                write!(f, "{site} carries {count} qualifiers")
            }
            Self::MismatchedSite {
                site,
                expected,
                found,
            } => write!(f, "{site} expects {expected} but requests {found}"),
        }
    }
}

struct PathDisplayer<'a> {
    path: &'a [Key],
}

impl<'a> PathDisplayer<'a> {
    fn new(path: &'a [Key]) -> Self {
        Self { path }
    }
}

impl Display for PathDisplayer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, key) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing_test::traced_test;

    use crate::container::injector::{InjectionError, TypedInjector};
    use crate::key::{self, ComponentRef};

    use super::*;

    #[derive(Debug)]
    struct Node {
        dependencies: Vec<ComponentRef>,
    }

    impl Node {
        fn new<const N: usize>(dependencies: [&'static str; N]) -> Self {
            Self {
                dependencies: dependencies
                    .into_iter()
                    .map(|name| ComponentRef::from(key::named::<u8>(name)))
                    .collect(),
            }
        }

        fn lazy(dependency: &'static str) -> Self {
            Self {
                dependencies: vec![ComponentRef::lazy(key::named::<u8>(dependency))],
            }
        }
    }

    impl TypedProvider for Node {
        type Output = u8;

        fn provide<I>(&self, _injector: &I) -> Result<Self::Output, InjectionError>
        where
            I: TypedInjector + ?Sized,
        {
            Ok(0)
        }

        fn dependencies(&self) -> Vec<ComponentRef> {
            self.dependencies.clone()
        }
    }

    fn registry<const N: usize>(nodes: [(&'static str, Node); N]) -> Registry {
        let mut registry = Registry::new();
        for (name, node) in nodes {
            registry.register(key::named(name), node).unwrap();
        }
        registry
    }

    fn cycle_of(registry: Registry) -> Vec<String> {
        match registry.freeze() {
            Err(RegistryError::CyclicDependencies { path }) => {
                path.iter().map(|key| format!("{:?}", key.qualifier().unwrap())).collect()
            }
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("the graph should be cyclic"),
        }
    }

    #[traced_test]
    #[test]
    fn registry_freeze_succeeds() {
        let registry = registry([
            ("top", Node::new(["left", "right"])),
            ("left", Node::new(["bottom"])),
            ("right", Node::new(["bottom"])),
            ("bottom", Node::new([])),
        ]);
        assert_eq!(registry.len(), 4);

        let context = registry.freeze().unwrap();
        assert_eq!(context.get(&key::named::<u8>("top")).unwrap(), Some(0));
        assert!(logs_contain("registry frozen"));
    }

    #[test]
    fn registry_freeze_fails_when_dependency_is_missing() {
        let registry = registry([
            ("top", Node::new(["middle"])),
            ("middle", Node::new(["bottom"])),
        ]);

        match registry.freeze() {
            Err(RegistryError::DependencyNotFound {
                component,
                dependency,
            }) => {
                assert_eq!(&component, key::named::<u8>("middle").key());
                assert_eq!(&dependency, key::named::<u8>("bottom").key());
            }
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("the dependency should be missing"),
        }
    }

    #[test]
    fn registry_freeze_fails_when_dependencies_are_cyclic() {
        let path = cycle_of(registry([("a", Node::new(["a"]))]));
        assert_eq!(path, vec!["\"a\"", "\"a\""]);

        let path = cycle_of(registry([
            ("a", Node::new(["b"])),
            ("b", Node::new(["a"])),
        ]));
        assert_eq!(path, vec!["\"a\"", "\"b\"", "\"a\""]);

        let path = cycle_of(registry([
            ("a", Node::new(["b"])),
            ("b", Node::new(["c"])),
            ("c", Node::new(["a"])),
        ]));
        assert_eq!(path, vec!["\"a\"", "\"b\"", "\"c\"", "\"a\""]);
    }

    #[test]
    fn registry_freeze_fails_when_cycle_is_below_root() {
        let path = cycle_of(registry([
            ("root", Node::new(["a"])),
            ("a", Node::new(["b"])),
            ("b", Node::new(["a"])),
        ]));
        assert_eq!(path, vec!["\"a\"", "\"b\"", "\"a\""]);
    }

    #[test]
    fn registry_freeze_fails_when_cycle_is_lazy() {
        let path = cycle_of(registry([
            ("a", Node::new(["b"])),
            ("b", Node::lazy("a")),
        ]));
        assert_eq!(path, vec!["\"a\"", "\"b\"", "\"a\""]);
    }

    #[test]
    fn registry_register_fails_when_key_is_duplicated() {
        let mut registry = Registry::new();
        registry.bind_instance(key::of::<Arc<str>>(), Arc::from("first")).unwrap();

        let err = registry
            .bind_instance(key::of::<Arc<str>>(), Arc::from("second"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::KeyDuplicated { .. }));
        assert_eq!(registry.len(), 1);
    }

    struct FailingModule;

    impl Module for FailingModule {
        fn configure(&self, _registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("missing configuration".into())
        }
    }

    struct DuplicatingModule;

    impl Module for DuplicatingModule {
        fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
            registry.bind_instance(key::of::<u8>(), 1)?;
            registry.bind_instance(key::of::<u8>(), 2)?;
            Ok(())
        }
    }

    #[test]
    fn registry_install_fails_when_module_fails() {
        let mut registry = Registry::new();

        match registry.install(&FailingModule).unwrap_err() {
            RegistryError::ModuleInner { module, source } => {
                assert!(module.ends_with("FailingModule"));
                assert_eq!(source.to_string(), "missing configuration");
            }
            err => panic!("unexpected error: {err}"),
        }

        let err = registry.install(&DuplicatingModule).unwrap_err();
        assert!(matches!(err, RegistryError::KeyDuplicated { .. }));
    }

    #[test]
    fn registry_error_display_succeeds() {
        let err = RegistryError::CyclicDependencies {
            path: vec![
                key::named::<u8>("a").into(),
                key::named::<u8>("b").into(),
                key::named::<u8>("a").into(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "cyclic dependencies: u8@\"a\" -> u8@\"b\" -> u8@\"a\""
        );
    }
}
