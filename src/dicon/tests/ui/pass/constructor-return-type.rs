use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};

use dicon::prelude::*;

#[derive(Inject)]
pub struct Test1;

#[component]
impl Test1 {
    #[inject]
    pub fn new() -> Self {
        todo!()
    }
}

#[derive(Inject)]
pub struct Test2;

#[component]
impl Test2 {
    #[inject]
    pub fn new() -> Test2 {
        todo!()
    }
}

#[derive(Inject)]
pub struct Test3;

#[component]
impl Test3 {
    #[inject]
    pub fn new() -> Result<Self, Infallible> {
        todo!()
    }
}

#[derive(Inject)]
pub struct Test4;

#[component]
impl Test4 {
    #[inject]
    pub fn create(_port: u16) -> std::result::Result<Test4, Refused> {
        todo!()
    }
}

#[derive(Inject)]
pub struct Test5;

#[component]
impl Test5 {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug)]
pub struct Refused;

impl Display for Refused {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "refused")
    }
}

impl std::error::Error for Refused {}

fn main() {}
