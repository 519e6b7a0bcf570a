//! Contract introspection
//!
//! Flattens a [`ContractDef`] and its ancestry into a [`ContractDescriptor`].
//!
//! ## Class contracts
//!
//! The single-inheritance chain is walked from the contract to its root.
//! Properties are deduplicated by name with the most-derived declaration
//! winning, and the carrier is the most-derived event whose name matches the
//! configured carrier name. A class without one is rejected: a class cannot
//! have a carrier synthesized for it.
//!
//! ## Interface contracts
//!
//! The extension graph is traversed breadth-first, visiting each interface
//! once. Properties are deduplicated by signature, so a member reached along
//! two paths of a diamond appears once, while two members sharing a name but
//! not a signature are both kept (the synthesizer rejects them). Interfaces
//! carry no code, so every accessor is demoted to abstract and the carrier
//! is always synthesized.

use observable_proxy_core::{
    CarrierDescriptor, ContractDef, ContractDescriptor, ContractKind, EventDescriptor,
    FieldDescriptor, PropertyDescriptor, ProxyError, ProxyResult,
};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

/// Introspect `def`, locating the carrier named `carrier_name`.
pub fn introspect(def: ContractDef, carrier_name: &str) -> ProxyResult<ContractDescriptor> {
    let descriptor = match def.kind() {
        ContractKind::Interface => introspect_interface(def, carrier_name)?,
        ContractKind::Class | ContractKind::AbstractClass => introspect_class(def, carrier_name)?,
    };

    debug!(
        contract = %descriptor.id,
        kind = %descriptor.kind,
        properties = descriptor.properties.len(),
        events = descriptor.events.len(),
        ancestors = descriptor.ancestry.len() - 1,
        "introspected contract"
    );
    Ok(descriptor)
}

fn introspect_class(def: ContractDef, carrier_name: &str) -> ProxyResult<ContractDescriptor> {
    let contract = def.id();
    let kind = def.kind();

    // Most-derived first.
    let mut chain = vec![def];
    let mut seen = FxHashSet::default();
    seen.insert(contract);

    loop {
        let current = &chain[chain.len() - 1];
        let parent = match current.parents() {
            [] => break,
            [parent] => *parent,
            parents => {
                return Err(ProxyError::unsupported(
                    contract.name(),
                    format!(
                        "{} declares {} base classes; a class extends at most one",
                        current.id(),
                        parents.len()
                    ),
                ))
            }
        };
        if !seen.insert(parent.id()) {
            return Err(ProxyError::unsupported(
                contract.name(),
                format!("cyclic class ancestry through {}", parent.id()),
            ));
        }
        let resolved = parent.resolve();
        if resolved.kind().is_interface() {
            return Err(ProxyError::unsupported(
                contract.name(),
                format!("{} cannot extend interface {}", current.id(), resolved.id()),
            ));
        }
        chain.push(resolved);
    }

    let mut properties = Vec::new();
    let mut overridden: FxHashSet<String> = FxHashSet::default();
    for level in &chain {
        for prop in level.properties() {
            if !overridden.contains(prop.name()) {
                properties.push(PropertyDescriptor::from_def(prop, level.id()));
            }
        }
        overridden.extend(level.properties().iter().map(|p| p.name().to_string()));
    }

    let mut events = Vec::new();
    let mut event_names: FxHashSet<&str> = FxHashSet::default();
    for level in &chain {
        for event in level.events() {
            if event_names.insert(event.as_str()) {
                events.push(EventDescriptor {
                    name: event.clone(),
                    declared_by: level.id(),
                });
            }
        }
    }

    let carrier = events
        .iter()
        .find(|e| e.name == carrier_name)
        .map(|e| CarrierDescriptor::Declared {
            name: e.name.clone(),
            declared_by: e.declared_by,
        })
        .ok_or_else(|| {
            ProxyError::unsupported(
                contract.name(),
                format!(
                    "no '{}' event is declared in its ancestry, and a {} cannot have one synthesized",
                    carrier_name, kind
                ),
            )
        })?;

    let fields = chain
        .iter()
        .rev()
        .flat_map(|level| {
            level.fields().iter().map(move |f| FieldDescriptor {
                name: f.name.clone(),
                initial: f.initial.clone(),
                declared_by: level.id(),
            })
        })
        .collect();

    Ok(ContractDescriptor {
        id: contract,
        kind,
        ancestry: chain.iter().map(ContractDef::id).collect(),
        properties,
        events,
        fields,
        carrier,
    })
}

fn introspect_interface(def: ContractDef, carrier_name: &str) -> ProxyResult<ContractDescriptor> {
    let contract = def.id();

    let mut visited = FxHashSet::default();
    visited.insert(contract);
    let mut queue = VecDeque::new();
    queue.push_back(def);

    let mut ancestry = Vec::new();
    let mut properties = Vec::new();
    let mut signatures = FxHashSet::default();
    let mut events = Vec::new();
    let mut event_names: FxHashSet<String> = FxHashSet::default();

    while let Some(current) = queue.pop_front() {
        if !current.kind().is_interface() {
            return Err(ProxyError::unsupported(
                contract.name(),
                format!(
                    "{} is a {} and cannot be extended by an interface",
                    current.id(),
                    current.kind()
                ),
            ));
        }
        ancestry.push(current.id());

        for parent in current.parents() {
            if visited.insert(parent.id()) {
                queue.push_back(parent.resolve());
            }
        }

        for prop in current.properties() {
            let descriptor = PropertyDescriptor::from_def(prop, current.id()).into_abstract();
            if signatures.insert(descriptor.signature()) {
                properties.push(descriptor);
            }
        }

        for event in current.events() {
            if event_names.insert(event.clone()) {
                events.push(EventDescriptor {
                    name: event.clone(),
                    declared_by: current.id(),
                });
            }
        }
    }

    Ok(ContractDescriptor {
        id: contract,
        kind: ContractKind::Interface,
        ancestry,
        properties,
        events,
        fields: Vec::new(),
        carrier: CarrierDescriptor::MustSynthesize {
            name: carrier_name.to_string(),
        },
    })
}
