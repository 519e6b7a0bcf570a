//! Mutation interceptor
//!
//! The body of every intercepted setter: capture the previous value, commit
//! the new one, then hand both to the type's dispatch hook. The write is
//! committed before the hook runs, so a failing handler never rolls it back.

use crate::instance::ProxyInstance;
use crate::synthesizer::{ReadPlan, WritePlan};
use observable_proxy_core::{ProxyResult, Value};
use std::sync::Arc;

pub(crate) fn intercept_write(
    instance: &mut ProxyInstance,
    property: &str,
    previous: &ReadPlan,
    write: &WritePlan,
    value: Value,
) -> ProxyResult<()> {
    let before = match previous {
        ReadPlan::Base(get) => get(instance.base()),
        ReadPlan::Backing(slot) => instance.backing_value(*slot).clone(),
        ReadPlan::BaseField(field) => instance.base().get(field),
    };

    let current = value.clone();
    match write {
        WritePlan::Base(set) => set(instance.base(), value),
        WritePlan::Backing(slot) => instance.set_backing_value(*slot, value),
    }

    let hook = Arc::clone(instance.synthesized_type().hook());
    hook.on_set(instance, property, &before, &current)
}
