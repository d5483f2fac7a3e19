pub mod dsl;

use std::any;
use std::error::Error;

use crate::container::registry::Registry;

pub use dsl::bind;

/// A unit of configuration adding bindings to a [`Registry`].
pub trait Module: 'static {
    fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// The name reported when the module fails.
    fn name(&self) -> &'static str {
        any::type_name::<Self>()
    }
}

/// A [`Module`] made of other modules, installed in the order they were
/// added.
#[derive(Default)]
pub struct Configuration {
    modules: Vec<Box<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn compose(mut self, mut other: Configuration) -> Self {
        self.modules.append(&mut other.modules);
        self
    }
}

impl Module for Configuration {
    fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
        for module in &self.modules {
            registry.install(&**module)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::container::injector::TypedInjector;
    use crate::container::registry::RegistryError;
    use crate::container::Context;
    use crate::key;

    use super::*;

    struct Numbers;

    impl Module for Numbers {
        fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
            registry.bind_instance(key::named::<u32>("one"), 1)?;
            registry.bind_instance(key::named::<u32>("two"), 2)?;
            Ok(())
        }
    }

    struct Words;

    impl Module for Words {
        fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
            registry.bind_instance(key::of::<&'static str>(), "words")?;
            Ok(())
        }
    }

    struct Broken;

    impl Module for Broken {
        fn configure(&self, _registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("broken".into())
        }
    }

    #[test]
    fn configuration_succeeds() {
        let configuration = Configuration::new()
            .with(Numbers)
            .compose(Configuration::new().with(Words));
        let context = Context::init(configuration).unwrap();

        assert_eq!(context.len(), 3);
        assert_eq!(context.get(&key::named::<u32>("two")).unwrap(), Some(2));
        assert_eq!(context.get(&key::of::<&'static str>()).unwrap(), Some("words"));
    }

    #[test]
    fn configuration_fails_when_inner_module_fails() {
        let configuration = Configuration::new().with(Numbers).with(Broken);

        match Context::init(configuration) {
            Err(RegistryError::ModuleInner { module, .. }) => assert!(module.ends_with("Broken")),
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("the module should fail"),
        }
    }

    #[test]
    fn configuration_fails_when_inner_module_duplicates_keys() {
        let configuration = Configuration::new().with(Numbers).with(Numbers);

        assert!(matches!(
            Context::init(configuration),
            Err(RegistryError::KeyDuplicated { .. })
        ));
    }
}
