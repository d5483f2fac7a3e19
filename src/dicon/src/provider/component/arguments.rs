use std::any;
use std::vec::IntoIter;

use crate::container::injector::InjectionError;
use crate::container::Managed;
use crate::util::any::Downcast;

/// The resolved values for the sites of a constructor or an inject method,
/// handed out in declaration order.
pub struct Arguments {
    component: &'static str,
    values: IntoIter<Box<dyn Managed>>,
    index: usize,
}

impl Arguments {
    pub(crate) fn new(component: &'static str, values: Vec<Box<dyn Managed>>) -> Self {
        Self {
            component,
            values: values.into_iter(),
            index: 0,
        }
    }

    /// Takes the next argument as a `V`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::InvalidArgument`] if the arguments are
    /// exhausted or the next one is not a `V`, which means the closure
    /// disagrees with the sites it was declared with.
    pub fn take<V>(&mut self) -> Result<V, InjectionError>
    where
        V: Managed,
    {
        let component = self.component;
        let index = self.index;
        self.index += 1;
        let invalid = || InjectionError::InvalidArgument {
            component,
            index,
            expected: any::type_name::<V>(),
        };

        let value = self.values.next().ok_or_else(invalid)?;
        value.downcast::<V>().map(|value| *value).map_err(|_| invalid())
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}
