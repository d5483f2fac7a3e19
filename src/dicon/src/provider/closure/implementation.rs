use std::any;
use std::error::Error;

use crate::container::injector::{InjectionError, Injector, TypedInjector};
use crate::container::Managed;
use crate::key::{self, ComponentRef};
use crate::provider::closure::Closure;

impl<F, T, E> Closure<()> for F
where
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    T: Managed,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    type Constructed = T;

    type Error = E;

    fn run(
        &self,
        _injector: &dyn Injector,
    ) -> Result<Result<Self::Constructed, Self::Error>, InjectionError> {
        Ok(self())
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        Vec::new()
    }
}

fn required<D, T>(injector: &dyn Injector) -> Result<D, InjectionError>
where
    D: Managed,
    T: Managed,
{
    let key = key::of::<D>();
    match injector.get(&key)? {
        Some(dependency) => Ok(dependency),
        None => Err(InjectionError::Unsatisfied {
            component: any::type_name::<T>(),
            dependency: key.into(),
        }),
    }
}

macro_rules! for_all_tuples {
    ($implementation:ident) => {
        $implementation!(D1);
        $implementation!(D1, D2);
        $implementation!(D1, D2, D3);
        $implementation!(D1, D2, D3, D4);
        $implementation!(D1, D2, D3, D4, D5);
        $implementation!(D1, D2, D3, D4, D5, D6);
        $implementation!(D1, D2, D3, D4, D5, D6, D7);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13, D14);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13, D14, D15);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13, D14, D15, D16);
    };
}

macro_rules! impl_closure {
    ($($dep:ident),*) => {
        #[allow(non_snake_case)]
        impl<F, T, E, $($dep,)*> Closure<($($dep,)*)> for F
        where
            F: Fn($($dep,)*) -> Result<T, E> + Send + Sync + 'static,
            T: Managed,
            E: Into<Box<dyn Error + Send + Sync>>,
            $($dep: Managed,)*
        {
            type Constructed = T;

            type Error = E;

            fn run(
                &self,
                injector: &dyn Injector,
            ) -> Result<Result<Self::Constructed, Self::Error>, InjectionError> {
                $(
                    let $dep = required::<$dep, T>(injector)?;
                )*
                Ok(self($($dep,)*))
            }

            fn dependencies(&self) -> Vec<ComponentRef> {
                vec![$(ComponentRef::from(key::of::<$dep>()),)*]
            }
        }
    };
}

for_all_tuples!(impl_closure);
