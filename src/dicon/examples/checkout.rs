use std::error::Error;
use std::num::NonZeroUsize;
use std::sync::Arc;

use dicon::prelude::*;
use dicon::scope::{Pooled, Singleton};
use parking_lot::Mutex;

fn main() {
    let context = Context::init(CheckoutModule { currency: "EUR" }).unwrap();

    let checkout = context.get(&key::of::<Arc<Checkout>>()).unwrap().unwrap();
    checkout.place("keyboard", 4_900);
    checkout.place("monitor", 21_900);

    let ledger = context.get(&key::of::<Arc<Ledger>>()).unwrap().unwrap();
    for line in ledger.lines() {
        println!("{line}");
    }
}

struct CheckoutModule {
    currency: &'static str,
}

impl Module for CheckoutModule {
    fn configure(&self, registry: &mut Registry) -> Result<(), Box<dyn Error + Send + Sync>> {
        bind::<&'static str>()
            .named("currency")
            .to_instance(self.currency)
            .set_on(registry)?;

        bind::<Arc<Ledger>>()
            .to_component::<Ledger>()
            .in_scope(Singleton)
            .set_on(registry)?;

        bind::<Arc<dyn Payment>>()
            .to_component_as::<CardPayment>(|payment| Arc::new(payment))
            .qualified_by(Method::Card)
            .in_scope(Pooled::new(NonZeroUsize::new(4).unwrap()))
            .set_on(registry)?;

        bind::<Arc<Checkout>>()
            .to_component::<Checkout>()
            .in_scope(Singleton)
            .set_on(registry)?;

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Method {
    Card,
}

#[derive(Inject)]
struct Ledger {
    lines: Mutex<Vec<String>>,
}

#[component]
impl Ledger {
    fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, line: String) {
        self.lines.lock().push(line);
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

trait Payment: Send + Sync + 'static {
    fn charge(&self, cents: u64) -> String;
}

#[derive(Inject)]
struct CardPayment {
    #[inject]
    #[named("currency")]
    currency: &'static str,
}

#[component]
impl CardPayment {
    fn new() -> Self {
        Self { currency: "" }
    }
}

impl Payment for CardPayment {
    fn charge(&self, cents: u64) -> String {
        format!("card charged {}.{:02} {}", cents / 100, cents % 100, self.currency)
    }
}

#[derive(Inject)]
struct Checkout {
    ledger: Arc<Ledger>,
    payment: Option<Arc<dyn Payment>>,
}

#[component]
impl Checkout {
    #[inject]
    fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            payment: None,
        }
    }

    #[inject]
    fn use_payment(&mut self, #[qualified(Method::Card)] payment: Arc<dyn Payment>) {
        self.payment = Some(payment);
    }

    fn place(&self, item: &str, cents: u64) {
        let receipt = match &self.payment {
            Some(payment) => payment.charge(cents),
            None => String::from("unpaid"),
        };
        self.ledger.record(format!("{item}: {receipt}"));
    }
}
