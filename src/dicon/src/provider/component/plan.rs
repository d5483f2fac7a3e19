use std::error::Error;
use std::sync::Arc;

use tracing::trace;

use crate::container::injector::{InjectionError, TypedInjector};
use crate::container::registry::IllegalReason;
use crate::container::Managed;
use crate::key::{ComponentRef, Site};
use crate::provider::component::descriptor::{
    Build, Constructor, Descriptor, Field, Invoke, Method, MethodKind, Setter,
};
use crate::provider::component::Arguments;

/// A [`Descriptor`] that passed every rule, with all sites turned into
/// references.
pub(super) struct InjectionPlan<T> {
    component: &'static str,
    constructor: PlannedCall<Build<T>>,
    levels: Vec<PlannedLevel<T>>,
    dependencies: Vec<ComponentRef>,
}

struct PlannedCall<F> {
    references: Vec<ComponentRef>,
    call: F,
}

struct PlannedField<T> {
    reference: ComponentRef,
    setter: Setter<T>,
}

struct PlannedLevel<T> {
    fields: Vec<PlannedField<T>>,
    methods: Vec<PlannedCall<Invoke<T>>>,
}

impl<T> InjectionPlan<T>
where
    T: Managed,
{
    pub fn resolve(
        component: &'static str,
        descriptor: Descriptor<T>,
    ) -> Result<Self, IllegalReason> {
        let (is_abstract, constructors, levels) = descriptor.into_parts();
        if is_abstract {
            return Err(IllegalReason::AbstractComponent);
        }

        let constructor = select_constructor(constructors)?;
        let constructor = PlannedCall {
            references: references(&constructor.sites, |index| {
                format!("constructor parameter #{index}")
            })?,
            call: constructor.build,
        };

        let mut planned = Vec::with_capacity(levels.len());
        let mut declared = Vec::with_capacity(levels.len());
        for level in levels {
            planned.push(plan_fields(level.fields)?);
            declared.push(level.methods);
        }

        let mut methods = Vec::new();
        for (depth, level_methods) in declared.into_iter().enumerate() {
            plan_methods(depth, level_methods, &mut methods)?;
        }
        for (depth, _, method) in methods {
            planned[depth].methods.push(method);
        }

        let mut dependencies = constructor.references.clone();
        for level in &planned {
            for field in &level.fields {
                dependencies.push(field.reference.clone());
            }
        }
        for level in &planned {
            for method in &level.methods {
                dependencies.extend(method.references.iter().cloned());
            }
        }

        Ok(Self {
            component,
            constructor,
            levels: planned,
            dependencies,
        })
    }

    pub fn dependencies(&self) -> &[ComponentRef] {
        &self.dependencies
    }

    pub fn instantiate<I>(&self, injector: &I) -> Result<T, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        trace!(component = self.component, "instantiating component");
        let mut arguments = self.arguments(injector, &self.constructor.references)?;
        let mut object =
            (self.constructor.call)(&mut arguments).map_err(|err| self.construction_error(err))?;

        for level in &self.levels {
            for field in &level.fields {
                let value = self.resolve_reference(injector, &field.reference)?;
                (field.setter)(&mut object, value);
            }
            for method in &level.methods {
                let mut arguments = self.arguments(injector, &method.references)?;
                (method.call)(&mut object, &mut arguments)
                    .map_err(|err| self.construction_error(err))?;
            }
        }
        Ok(object)
    }

    fn resolve_reference<I>(
        &self,
        injector: &I,
        reference: &ComponentRef,
    ) -> Result<Box<dyn Managed>, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        match injector.dyn_get(reference)? {
            Some(value) => Ok(value),
            None => Err(InjectionError::Unsatisfied {
                component: self.component,
                dependency: reference.clone(),
            }),
        }
    }

    fn arguments<I>(
        &self,
        injector: &I,
        references: &[ComponentRef],
    ) -> Result<Arguments, InjectionError>
    where
        I: TypedInjector + ?Sized,
    {
        let values = references
            .iter()
            .map(|reference| self.resolve_reference(injector, reference))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Arguments::new(self.component, values))
    }

    fn construction_error(&self, source: Box<dyn Error + Send + Sync>) -> InjectionError {
        InjectionError::ObjectConstruction {
            component: self.component,
            source: Arc::from(source),
        }
    }
}

fn select_constructor<T>(constructors: Vec<Constructor<T>>) -> Result<Constructor<T>, IllegalReason>
where
    T: Managed,
{
    let (mut injectable, fallback): (Vec<_>, Vec<_>) = constructors
        .into_iter()
        .partition(Constructor::is_injectable);

    if injectable.len() > 1 {
        return Err(IllegalReason::AmbiguousConstructor {
            count: injectable.len(),
        });
    }
    injectable
        .pop()
        .or_else(|| fallback.into_iter().next())
        .ok_or(IllegalReason::NoUsableConstructor)
}

fn references<F>(sites: &[Site], describe: F) -> Result<Vec<ComponentRef>, IllegalReason>
where
    F: Fn(usize) -> String,
{
    sites
        .iter()
        .enumerate()
        .map(|(index, site)| reference(site, || describe(index)))
        .collect()
}

fn reference<F>(site: &Site, describe: F) -> Result<ComponentRef, IllegalReason>
where
    F: FnOnce() -> String,
{
    site.reference()
        .map_err(|count| IllegalReason::MultipleQualifiers {
            site: describe(),
            count,
        })
}

fn plan_fields<T>(fields: Vec<Field<T>>) -> Result<PlannedLevel<T>, IllegalReason>
where
    T: Managed,
{
    let mut planned = Vec::with_capacity(fields.len());
    for field in fields {
        if field.read_only {
            return Err(IllegalReason::FinalInjectedField { field: field.name });
        }
        if field.site.value_type() != field.value_type {
            return Err(IllegalReason::MismatchedSite {
                site: format!("field `{}`", field.name),
                expected: field.value_name,
                found: field.site.value_name(),
            });
        }
        let reference = reference(&field.site, || format!("field `{}`", field.name))?;
        planned.push(PlannedField {
            reference,
            setter: field.setter,
        });
    }
    Ok(PlannedLevel {
        fields: planned,
        methods: Vec::new(),
    })
}

/// Collects the injectable methods of one level into `collected`.
///
/// An overriding method removes every same-named method collected from the
/// levels before it; it is then collected itself only if it is tagged.
fn plan_methods<T>(
    depth: usize,
    methods: Vec<Method<T>>,
    collected: &mut Vec<(usize, &'static str, PlannedCall<Invoke<T>>)>,
) -> Result<(), IllegalReason>
where
    T: Managed,
{
    for method in methods {
        let name = method.name;
        if method.overriding {
            collected.retain(|(level, other, _)| *level == depth || *other != name);
        }
        match method.kind {
            MethodKind::Plain => {}
            MethodKind::Generic => {
                return Err(IllegalReason::GenericInjectMethod { method: name });
            }
            MethodKind::Inject { sites, invoke } => {
                let references = references(&sites, |index| {
                    format!("method `{name}` parameter #{index}")
                })?;
                collected.push((
                    depth,
                    name,
                    PlannedCall {
                        references,
                        call: invoke,
                    },
                ));
            }
        }
    }
    Ok(())
}
