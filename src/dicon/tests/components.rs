use std::convert::Infallible;
use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroUsize;
use std::sync::Arc;

use dicon::container::registry::IllegalReason;
use dicon::prelude::*;
use dicon::scope::{Pooled, Singleton};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Journal {
    entries: Mutex<Vec<String>>,
}

impl Journal {
    fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// A value whose construction is recorded in the journal.
#[derive(Debug, Clone)]
struct Marker;

fn marker(name: &'static str) -> impl Fn(Arc<Journal>) -> Result<Marker, Infallible> {
    move |journal: Arc<Journal>| {
        journal.record(name);
        Ok(Marker)
    }
}

#[derive(Inject)]
struct Service {
    journal: Arc<Journal>,
    #[inject]
    #[named("service")]
    marker: Option<Marker>,
    #[inject]
    #[named("port")]
    port: u16,
}

#[component]
impl Service {
    #[inject]
    fn new(journal: Arc<Journal>) -> Self {
        journal.record("service constructor");
        Self {
            journal,
            marker: None,
            port: 0,
        }
    }

    #[inject]
    fn configure(&mut self, #[named("port")] port: u16) {
        self.journal.record(format!("service configure {port}"));
    }

    #[inject]
    fn start(&mut self) {
        self.journal.record("service start");
    }
}

#[derive(Inject)]
struct AuditedService {
    #[extends]
    service: Service,
    #[inject]
    #[named("audit")]
    marker: Option<Marker>,
}

#[component]
impl AuditedService {
    #[inject]
    fn new(journal: Arc<Journal>) -> Self {
        Self {
            service: Service::new(journal),
            marker: None,
        }
    }

    #[inject]
    #[overrides]
    fn start(&mut self) {
        self.service.journal.record("audited start");
    }
}

#[derive(Inject)]
struct QuietService {
    #[extends]
    service: Service,
}

#[component]
impl QuietService {
    #[inject]
    fn new(journal: Arc<Journal>) -> Self {
        Self {
            service: Service::new(journal),
        }
    }

    #[overrides]
    fn start(&mut self) {
        self.service.journal.record("never called");
    }
}

struct ServiceModule {
    journal: Arc<Journal>,
}

impl Module for ServiceModule {
    fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
        bind::<Arc<Journal>>()
            .to_instance(self.journal.clone())
            .set_on(registry)?;
        bind::<u16>().named("port").to_instance(8080).set_on(registry)?;
        bind::<Option<Marker>>()
            .named("service")
            .to_closure(|journal: Arc<Journal>| marker("service field")(journal).map(Some))
            .set_on(registry)?;
        bind::<Option<Marker>>()
            .named("audit")
            .to_closure(|journal: Arc<Journal>| marker("audit field")(journal).map(Some))
            .set_on(registry)?;
        bind::<Service>().set_on(registry)?;
        bind::<AuditedService>().set_on(registry)?;
        bind::<QuietService>().set_on(registry)?;
        Ok(())
    }
}

fn init() -> (Context, Arc<Journal>) {
    let journal = Arc::new(Journal::default());
    let context = Context::init(ServiceModule {
        journal: journal.clone(),
    })
    .unwrap();
    (context, journal)
}

#[test]
fn component_injection_runs_in_order() {
    let (context, journal) = init();

    let service = context.get(&key::of::<Service>()).unwrap().unwrap();
    assert!(service.marker.is_some());
    assert_eq!(service.port, 8080);
    assert_eq!(
        journal.entries(),
        [
            "service constructor",
            "service field",
            "service configure 8080",
            "service start",
        ]
    );
}

#[test]
fn base_level_is_injected_before_derived_level() {
    let (context, journal) = init();

    let audited = context.get(&key::of::<AuditedService>()).unwrap().unwrap();
    assert!(audited.service.marker.is_some());
    assert!(audited.marker.is_some());
    assert_eq!(audited.service.port, 8080);
    assert_eq!(
        journal.entries(),
        [
            "service constructor",
            "service field",
            "service configure 8080",
            "audit field",
            "audited start",
        ]
    );
}

#[test]
fn untagged_override_disables_base_method() {
    let (context, journal) = init();

    let quiet = context.get(&key::of::<QuietService>()).unwrap().unwrap();
    assert_eq!(quiet.service.port, 8080);
    assert_eq!(
        journal.entries(),
        [
            "service constructor",
            "service field",
            "service configure 8080",
        ]
    );
}

#[test]
fn component_dependencies_are_listed() {
    use dicon::key::ComponentRef;
    use dicon::provider::component::InjectionProvider;
    use dicon::provider::TypedProvider;

    let provider = InjectionProvider::<AuditedService>::new().unwrap();
    let dependencies = provider.dependencies();

    assert_eq!(
        dependencies,
        [
            ComponentRef::from(key::of::<Arc<Journal>>()),
            ComponentRef::from(key::named::<Option<Marker>>("service")),
            ComponentRef::from(key::named::<u16>("port")),
            ComponentRef::from(key::named::<Option<Marker>>("audit")),
            ComponentRef::from(key::named::<u16>("port")),
        ]
    );
}

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Inject)]
struct FixedClock;

#[component]
impl FixedClock {
    fn new() -> Self {
        Self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        1_700_000_000
    }
}

#[derive(Inject)]
struct Scheduler {
    clock: Lazy<Arc<dyn Clock>>,
}

#[component]
impl Scheduler {
    #[inject]
    fn new(clock: Lazy<Arc<dyn Clock>>) -> Self {
        Self { clock }
    }
}

struct ClockModule;

impl Module for ClockModule {
    fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
        bind::<Arc<dyn Clock>>()
            .to_component_as::<FixedClock>(|clock| Arc::new(clock))
            .in_scope(Singleton)
            .set_on(registry)?;
        bind::<Arc<Scheduler>>()
            .to_component::<Scheduler>()
            .in_scope(Pooled::new(NonZeroUsize::new(2).unwrap()))
            .set_on(registry)?;
        Ok(())
    }
}

#[test]
fn singleton_and_pooled_components_succeed() {
    let context = Context::init(ClockModule).unwrap();

    let first = context.get(&key::of::<Arc<dyn Clock>>()).unwrap().unwrap();
    let second = context.get(&key::of::<Arc<dyn Clock>>()).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let schedulers = (0..4)
        .map(|_| context.get(&key::of::<Arc<Scheduler>>()).unwrap().unwrap())
        .collect::<Vec<_>>();
    assert!(Arc::ptr_eq(&schedulers[0], &schedulers[2]));
    assert!(Arc::ptr_eq(&schedulers[1], &schedulers[3]));
    assert!(!Arc::ptr_eq(&schedulers[0], &schedulers[1]));

    let clock = schedulers[0].clock.get().unwrap();
    assert!(Arc::ptr_eq(&clock, &first));
    assert_eq!(clock.now(), 1_700_000_000);
}

struct Sentinel;

#[derive(Inject)]
struct Holder {
    sentinel: Lazy<Arc<Sentinel>>,
}

#[component]
impl Holder {
    #[inject]
    fn new(sentinel: Lazy<Arc<Sentinel>>) -> Self {
        Self { sentinel }
    }
}

#[test]
fn lazy_handle_in_singleton_does_not_keep_context_alive() {
    let sentinel = Arc::new(Sentinel);
    let weak = Arc::downgrade(&sentinel);

    let mut registry = Registry::new();
    bind::<Arc<Sentinel>>()
        .to_instance(sentinel)
        .set_on(&mut registry)
        .unwrap();
    bind::<Arc<Holder>>()
        .to_component::<Holder>()
        .in_scope(Singleton)
        .set_on(&mut registry)
        .unwrap();
    let context = registry.freeze().unwrap();

    let holder = context.get(&key::of::<Arc<Holder>>()).unwrap().unwrap();
    assert!(holder.sentinel.get().is_ok());

    drop(context);
    assert!(weak.upgrade().is_none());
    assert!(matches!(
        holder.sentinel.get(),
        Err(InjectionError::ContextDropped { .. })
    ));
}

#[derive(Debug)]
struct Refused;

impl Display for Refused {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "refused")
    }
}

impl Error for Refused {}

#[derive(Inject)]
struct Unreachable;

#[component]
impl Unreachable {
    #[inject]
    fn connect(#[named("port")] port: u16) -> Result<Self, Refused> {
        let _ = port;
        Err(Refused)
    }
}

#[test]
fn get_fails_when_constructor_fails() {
    let mut registry = Registry::new();
    bind::<u16>()
        .named("port")
        .to_instance(1)
        .set_on(&mut registry)
        .unwrap();
    bind::<Unreachable>().set_on(&mut registry).unwrap();
    let context = registry.freeze().unwrap();

    match context.get(&key::of::<Unreachable>()) {
        Err(InjectionError::ObjectConstruction { source, .. }) => {
            assert!(source.downcast_ref::<Refused>().is_some());
        }
        _ => panic!("construction should fail"),
    }
}

#[test]
fn freeze_fails_when_field_dependency_is_missing() {
    let mut registry = Registry::new();
    bind::<Arc<Journal>>()
        .to_instance(Arc::default())
        .set_on(&mut registry)
        .unwrap();
    bind::<u16>()
        .named("port")
        .to_instance(8080)
        .set_on(&mut registry)
        .unwrap();
    bind::<Service>().set_on(&mut registry).unwrap();

    match registry.freeze() {
        Err(RegistryError::DependencyNotFound {
            component,
            dependency,
            ..
        }) => {
            assert_eq!(component, key::of::<Service>().into_key());
            assert_eq!(dependency, key::named::<Option<Marker>>("service").into_key());
        }
        _ => panic!("missing field dependency should be reported"),
    }
}

#[derive(Inject)]
struct Sealed {
    #[inject(read_only)]
    port: u16,
}

#[component]
impl Sealed {
    fn new() -> Self {
        Self { port: 0 }
    }
}

#[derive(Inject)]
struct Ambiguous;

#[component]
impl Ambiguous {
    #[inject]
    fn first() -> Self {
        Self
    }

    #[inject]
    fn second(_port: u16) -> Self {
        Self
    }
}

#[derive(Inject)]
struct Template;

#[component(abstract)]
impl Template {
    fn new() -> Self {
        Self
    }
}

#[derive(Inject)]
struct Plugin;

#[component]
impl Plugin {
    fn new() -> Self {
        Self
    }

    #[inject]
    fn load<T: Send + Sync + 'static>(&mut self) {}
}

#[derive(Inject)]
struct Doubly {
    #[inject]
    #[named("port")]
    #[qualified(1u8)]
    port: u16,
}

#[component]
impl Doubly {
    fn new() -> Self {
        Self { port: 0 }
    }
}

fn illegal_reason(result: Result<(), RegistryError>) -> IllegalReason {
    match result {
        Err(RegistryError::IllegalComponent { reason, .. }) => reason,
        Err(err) => panic!("unexpected error: {err}"),
        Ok(()) => panic!("component should be rejected"),
    }
}

#[test]
fn bind_fails_when_component_is_illegal() {
    let mut registry = Registry::new();

    assert_eq!(
        illegal_reason(bind::<Sealed>().set_on(&mut registry)),
        IllegalReason::FinalInjectedField { field: "port" }
    );
    assert_eq!(
        illegal_reason(bind::<Ambiguous>().set_on(&mut registry)),
        IllegalReason::AmbiguousConstructor { count: 2 }
    );
    assert_eq!(
        illegal_reason(bind::<Template>().set_on(&mut registry)),
        IllegalReason::AbstractComponent
    );
    assert_eq!(
        illegal_reason(bind::<Plugin>().set_on(&mut registry)),
        IllegalReason::GenericInjectMethod { method: "load" }
    );
    assert!(matches!(
        illegal_reason(bind::<Doubly>().set_on(&mut registry)),
        IllegalReason::MultipleQualifiers { count: 2, .. }
    ));
    assert!(registry.is_empty());
}
