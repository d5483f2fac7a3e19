use std::sync::Arc;

use dicon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Store {
    Primary,
}

#[derive(Inject)]
pub struct Repository {
    #[inject]
    #[named("table")]
    table: Arc<String>,
    #[inject(read_only)]
    #[qualified(Store::Primary)]
    store: Arc<String>,
    #[inject]
    retries: Lazy<u8>,
    timeout: Option<u32>,
}

#[component]
impl Repository {
    #[inject]
    pub fn new(#[named("timeout")] timeout: u32) -> Self {
        todo!("{timeout}")
    }

    #[inject]
    pub fn connect(&mut self, #[qualified(Store::Primary)] url: Arc<String>, retries: Lazy<u8>) {
        let _ = (url, retries, &self.table, &self.store, &self.retries, self.timeout);
    }

    #[inject]
    pub fn install<T: Send + Sync + 'static>(&mut self) {}

    pub fn describe(&self) -> String {
        String::from("repository")
    }
}

#[derive(Inject)]
pub struct Cached {
    #[extends]
    repository: Repository,
}

#[component]
impl Cached {
    #[inject]
    pub fn new(repository_timeout: u32) -> Self {
        todo!("{repository_timeout}")
    }

    #[overrides]
    pub fn connect(&mut self, _url: Arc<String>, _retries: Lazy<u8>) {
        let _ = &self.repository;
    }
}

#[derive(Inject)]
#[allow(dead_code)]
pub struct Base {
    #[inject]
    name: Arc<String>,
}

#[component(abstract)]
impl Base {}

fn main() {}
