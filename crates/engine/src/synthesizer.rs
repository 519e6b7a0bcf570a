//! Proxy type synthesis
//!
//! Turns a [`ContractDescriptor`] into a [`SynthesizedType`]: the accessor
//! plan of every property, the backing-field and base-field layout, and the
//! carrier fields of the instances.
//!
//! # Storage policy
//!
//! | Contract slot | Getter | Setter |
//! |---------------|--------|--------|
//! | concrete (class) | forwards to the base, never intercepted | base setter, intercepted |
//! | abstract / interface | backing field | backing field, intercepted |
//! | missing | not readable | not writable |
//!
//! Non-overridable members cannot be re-routed and pass straight through to
//! the base. Backing fields are allocated once per property, only when one of
//! its accessors needs storage.
//!
//! # Invariants
//!
//! 1. A synthesized type is created at most once per contract (enforced by
//!    the [`TypeCache`](crate::TypeCache), not here).
//! 2. Every overridable setter is intercepted.
//! 3. Getters are never intercepted.

use crate::dispatch::DispatchHook;
use crate::instance::ProxyInstance;
use observable_proxy_core::{
    ContractDescriptor, ContractId, ContractKind, Getter, PropertyDescriptor, ProxyError,
    ProxyResult, Setter, Slot, Value, ValueType,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// Synthesized type identity
// ============================================================================

/// Unique identity of a synthesized type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SynthesizedTypeId(Uuid);

impl SynthesizedTypeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SynthesizedTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

// ============================================================================
// Accessor plans
// ============================================================================

/// Where a property's value lives on a proxy instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePolicy {
    /// Accessors forward to the contract's base implementation
    DelegateToBase,
    /// The proxy owns a private backing field
    OwnBackingField,
}

/// How a generated getter reads
#[derive(Clone)]
pub(crate) enum GetterPlan {
    Missing,
    Base(Getter),
    Backing(usize),
}

/// How the interceptor captures the previous value
#[derive(Clone)]
pub(crate) enum ReadPlan {
    Base(Getter),
    Backing(usize),
    /// Base setter without a base getter: read the field it stores into
    BaseField(String),
}

/// Where the interceptor commits the new value
#[derive(Clone)]
pub(crate) enum WritePlan {
    Base(Setter),
    Backing(usize),
}

/// How a generated setter writes
#[derive(Clone)]
pub(crate) enum SetterPlan {
    Missing,
    /// Non-overridable base setter, not intercepted
    Passthrough(Setter),
    Intercepted { previous: ReadPlan, write: WritePlan },
}

/// One property of a synthesized type
#[derive(Clone)]
pub struct SynthesizedProperty {
    name: String,
    value_type: ValueType,
    storage: StoragePolicy,
    getter: GetterPlan,
    setter: SetterPlan,
}

impl SynthesizedProperty {
    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Storage policy chosen at synthesis
    pub fn storage(&self) -> StoragePolicy {
        self.storage
    }

    /// Whether writes go through the mutation interceptor
    pub fn is_intercepted(&self) -> bool {
        matches!(self.setter, SetterPlan::Intercepted { .. })
    }

    /// Whether the property has a getter
    pub fn is_readable(&self) -> bool {
        !matches!(self.getter, GetterPlan::Missing)
    }

    /// Whether the property has a setter
    pub fn is_writable(&self) -> bool {
        !matches!(self.setter, SetterPlan::Missing)
    }

    pub(crate) fn getter_plan(&self) -> &GetterPlan {
        &self.getter
    }

    pub(crate) fn setter_plan(&self) -> &SetterPlan {
        &self.setter
    }
}

impl fmt::Debug for SynthesizedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizedProperty")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("storage", &self.storage)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("intercepted", &self.is_intercepted())
            .finish()
    }
}

// ============================================================================
// Layout
// ============================================================================

/// A private field owned by the proxy
#[derive(Debug, Clone)]
pub struct BackingField {
    /// Field name (`_{property}`)
    pub name: String,
    /// Property stored in the field
    pub property: String,
    /// Value on construction
    pub initial: Value,
}

/// Who provides a carrier field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierOrigin {
    /// Declared by a class in the contract's ancestry
    Inherited(ContractId),
    /// Synthesized on the proxy type
    Synthesized,
}

/// A subscriber-list field of the instances
#[derive(Debug, Clone)]
pub struct CarrierField {
    /// Event name
    pub name: String,
    /// Who provides the field
    pub origin: CarrierOrigin,
}

/// One level of a synthesized type's ancestry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLevel {
    /// The synthesized type itself
    Synthesized,
    /// The contract or one of its ancestors
    Contract(ContractId),
}

impl TypeLevel {
    fn provides(self, origin: CarrierOrigin) -> bool {
        match (self, origin) {
            (TypeLevel::Synthesized, CarrierOrigin::Synthesized) => true,
            (TypeLevel::Contract(level), CarrierOrigin::Inherited(owner)) => level == owner,
            _ => false,
        }
    }
}

// ============================================================================
// Synthesized type
// ============================================================================

/// A proxy type derived from a contract
pub struct SynthesizedType {
    id: SynthesizedTypeId,
    name: String,
    contract: ContractDescriptor,
    ancestry: Vec<TypeLevel>,
    properties: Vec<SynthesizedProperty>,
    by_name: FxHashMap<String, usize>,
    backing_fields: Vec<BackingField>,
    base_fields: Vec<(String, Value)>,
    carrier_fields: Vec<CarrierField>,
    hook: Arc<dyn DispatchHook>,
}

impl SynthesizedType {
    /// Unique id
    pub fn id(&self) -> SynthesizedTypeId {
        self.id
    }

    /// Generated type name, `{Contract}_Proxy_{id}`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The introspected contract
    pub fn contract(&self) -> &ContractDescriptor {
        &self.contract
    }

    /// Identity of the contract
    pub fn contract_id(&self) -> ContractId {
        self.contract.id
    }

    /// Name of the notification carrier event
    pub fn carrier_name(&self) -> &str {
        self.contract.carrier.name()
    }

    /// The synthesized level followed by the contract ancestry
    pub fn ancestry(&self) -> &[TypeLevel] {
        &self.ancestry
    }

    /// Whether instances are-a `contract`
    pub fn is_a(&self, contract: ContractId) -> bool {
        self.ancestry.contains(&TypeLevel::Contract(contract))
    }

    /// All properties
    pub fn properties(&self) -> &[SynthesizedProperty] {
        &self.properties
    }

    /// Property by name
    pub fn property(&self, name: &str) -> Option<&SynthesizedProperty> {
        self.by_name.get(name).map(|&index| &self.properties[index])
    }

    /// Storage policy of a property
    pub fn storage_policy(&self, name: &str) -> Option<StoragePolicy> {
        self.property(name).map(SynthesizedProperty::storage)
    }

    /// Private backing fields, in allocation order
    pub fn backing_fields(&self) -> &[BackingField] {
        &self.backing_fields
    }

    /// Initial base-field values
    pub fn base_fields(&self) -> &[(String, Value)] {
        &self.base_fields
    }

    /// Carrier fields of the instances
    pub fn carrier_fields(&self) -> &[CarrierField] {
        &self.carrier_fields
    }

    /// Dispatch hook called by every intercepted setter
    pub fn hook(&self) -> &Arc<dyn DispatchHook> {
        &self.hook
    }

    /// Find the carrier for event `name` by walking the ancestry from the
    /// synthesized level to the root.
    pub fn locate_carrier(&self, name: &str) -> Option<usize> {
        self.ancestry.iter().find_map(|&level| {
            self.carrier_fields
                .iter()
                .position(|field| field.name == name && level.provides(field.origin))
        })
    }

    /// Carrier field index of event `name`, regardless of origin
    pub fn event_slot(&self, name: &str) -> Option<usize> {
        self.carrier_fields.iter().position(|field| field.name == name)
    }

    /// Construct a default-initialized instance
    pub fn instantiate(self: &Arc<Self>) -> ProxyInstance {
        ProxyInstance::new(Arc::clone(self))
    }
}

impl fmt::Debug for SynthesizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizedType")
            .field("name", &self.name)
            .field("contract", &self.contract.id)
            .field("properties", &self.properties)
            .field("backing_fields", &self.backing_fields.len())
            .field("carrier_fields", &self.carrier_fields)
            .finish()
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// Synthesize the proxy type for an introspected contract.
///
/// `hook` is threaded into the type and called by every intercepted setter.
pub fn synthesize(
    contract: ContractDescriptor,
    hook: Arc<dyn DispatchHook>,
) -> ProxyResult<SynthesizedType> {
    check_member_names(&contract)?;

    let mut layout = Layout::default();
    let mut properties = Vec::with_capacity(contract.properties.len());
    for prop in &contract.properties {
        properties.push(plan_property(&contract, prop, &mut layout)?);
    }

    let mut base_fields: Vec<(String, Value)> = contract
        .fields
        .iter()
        .map(|f| (f.name.clone(), f.initial.clone()))
        .collect();
    base_fields.extend(layout.base_seeds);

    let carrier_fields = carrier_fields(&contract);

    let ancestry = std::iter::once(TypeLevel::Synthesized)
        .chain(contract.ancestry.iter().copied().map(TypeLevel::Contract))
        .collect();

    let by_name = properties
        .iter()
        .enumerate()
        .map(|(index, p): (usize, &SynthesizedProperty)| (p.name.clone(), index))
        .collect();

    let id = SynthesizedTypeId::new();
    let name = format!("{}_Proxy_{}", contract.name(), id);

    debug!(
        contract = %contract.id,
        synthesized = %name,
        properties = properties.len(),
        backing_fields = layout.backing.len(),
        carriers = carrier_fields.len(),
        "synthesized proxy type"
    );

    Ok(SynthesizedType {
        id,
        name,
        contract,
        ancestry,
        properties,
        by_name,
        backing_fields: layout.backing,
        base_fields,
        carrier_fields,
        hook,
    })
}

#[derive(Default)]
struct Layout {
    backing: Vec<BackingField>,
    base_seeds: Vec<(String, Value)>,
}

fn check_member_names(contract: &ContractDescriptor) -> ProxyResult<()> {
    let mut seen: FxHashMap<&str, &PropertyDescriptor> = FxHashMap::default();
    for prop in &contract.properties {
        if let Some(first) = seen.insert(prop.name.as_str(), prop) {
            let reason = if first.signature() == prop.signature() {
                format!(
                    "property '{}' is declared twice by {}",
                    prop.name, prop.declared_by
                )
            } else {
                format!(
                    "irreconcilable signatures for property '{}': {} declares {:?}, {} declares {:?}",
                    prop.name,
                    first.declared_by,
                    first.signature(),
                    prop.declared_by,
                    prop.signature()
                )
            };
            return Err(ProxyError::generation(contract.name(), reason));
        }
    }

    if let Some(event) = contract
        .events
        .iter()
        .find(|e| seen.contains_key(e.name.as_str()))
    {
        return Err(ProxyError::generation(
            contract.name(),
            format!(
                "event '{}' of {} collides with a property of the same name",
                event.name, event.declared_by
            ),
        ));
    }
    Ok(())
}

fn plan_property(
    contract: &ContractDescriptor,
    prop: &PropertyDescriptor,
    layout: &mut Layout,
) -> ProxyResult<SynthesizedProperty> {
    let initial = prop
        .initializer
        .clone()
        .unwrap_or_else(|| prop.value_type.default_value());

    if !prop.overridable {
        return plan_sealed(contract, prop, initial, layout);
    }

    let has_abstract_slot =
        matches!(prop.getter, Slot::Abstract) || matches!(prop.setter, Slot::Abstract);
    if contract.kind == ContractKind::Class && has_abstract_slot {
        return Err(ProxyError::generation(
            contract.name(),
            format!(
                "concrete class declares abstract member '{}' ({})",
                prop.name, prop.declared_by
            ),
        ));
    }

    // Interfaces never supply bodies, even if a definition attached one.
    let use_base = contract.kind.is_class();
    let mut backing: Option<usize> = None;
    let mut backing_slot = |layout: &mut Layout| -> usize {
        *backing.get_or_insert_with(|| {
            layout.backing.push(BackingField {
                name: format!("_{}", prop.name),
                property: prop.name.clone(),
                initial: initial.clone(),
            });
            layout.backing.len() - 1
        })
    };

    let getter = match &prop.getter {
        Slot::Missing => GetterPlan::Missing,
        Slot::Concrete(get) if use_base => GetterPlan::Base(Arc::clone(get)),
        Slot::Abstract | Slot::Concrete(_) => GetterPlan::Backing(backing_slot(layout)),
    };

    let setter = match &prop.setter {
        Slot::Missing => SetterPlan::Missing,
        Slot::Concrete(set) if use_base => SetterPlan::Intercepted {
            previous: previous_from_base(contract, prop)?,
            write: WritePlan::Base(Arc::clone(set)),
        },
        Slot::Abstract | Slot::Concrete(_) => {
            let slot = backing_slot(layout);
            SetterPlan::Intercepted {
                previous: ReadPlan::Backing(slot),
                write: WritePlan::Backing(slot),
            }
        }
    };

    let storage = if backing.is_some() {
        StoragePolicy::OwnBackingField
    } else {
        seed_base_field(contract, prop, initial, layout)?;
        StoragePolicy::DelegateToBase
    };

    Ok(SynthesizedProperty {
        name: prop.name.clone(),
        value_type: prop.value_type,
        storage,
        getter,
        setter,
    })
}

fn plan_sealed(
    contract: &ContractDescriptor,
    prop: &PropertyDescriptor,
    initial: Value,
    layout: &mut Layout,
) -> ProxyResult<SynthesizedProperty> {
    let getter = match &prop.getter {
        Slot::Missing => GetterPlan::Missing,
        Slot::Concrete(get) if contract.kind.is_class() => GetterPlan::Base(Arc::clone(get)),
        Slot::Abstract | Slot::Concrete(_) => return Err(sealed_without_body(contract, prop)),
    };
    let setter = match &prop.setter {
        Slot::Missing => SetterPlan::Missing,
        Slot::Concrete(set) if contract.kind.is_class() => SetterPlan::Passthrough(Arc::clone(set)),
        Slot::Abstract | Slot::Concrete(_) => return Err(sealed_without_body(contract, prop)),
    };

    seed_base_field(contract, prop, initial, layout)?;
    Ok(SynthesizedProperty {
        name: prop.name.clone(),
        value_type: prop.value_type,
        storage: StoragePolicy::DelegateToBase,
        getter,
        setter,
    })
}

fn sealed_without_body(contract: &ContractDescriptor, prop: &PropertyDescriptor) -> ProxyError {
    ProxyError::generation(
        contract.name(),
        format!(
            "non-overridable property '{}' has no base implementation to forward to",
            prop.name
        ),
    )
}

/// How an intercepted base setter reads the value it is about to replace.
///
/// Without a base getter the value can only be read back from the base
/// field the setter stores into.
fn previous_from_base(
    contract: &ContractDescriptor,
    prop: &PropertyDescriptor,
) -> ProxyResult<ReadPlan> {
    match (&prop.getter, &prop.base_field) {
        (Slot::Concrete(get), _) => Ok(ReadPlan::Base(Arc::clone(get))),
        (_, Some(field)) => Ok(ReadPlan::BaseField(field.clone())),
        (Slot::Abstract | Slot::Missing, None) => Err(ProxyError::generation(
            contract.name(),
            format!(
                "property '{}' has a base setter but no base getter to read the previous value",
                prop.name
            ),
        )),
    }
}

/// Seed the base field of a base-delegating property.
///
/// Auto-properties always own one; custom accessors only when a field was
/// declared with `initial_in`.
fn seed_base_field(
    contract: &ContractDescriptor,
    prop: &PropertyDescriptor,
    initial: Value,
    layout: &mut Layout,
) -> ProxyResult<()> {
    match (&prop.base_field, &prop.initializer) {
        (Some(field), _) => layout.base_seeds.push((field.clone(), initial)),
        (None, Some(_)) => {
            return Err(ProxyError::generation(
                contract.name(),
                format!(
                    "initializer of custom property '{}' needs the base field its accessors use",
                    prop.name
                ),
            ))
        }
        (None, None) => {}
    }
    Ok(())
}

fn carrier_fields(contract: &ContractDescriptor) -> Vec<CarrierField> {
    if contract.kind.is_class() {
        return contract
            .events
            .iter()
            .map(|e| CarrierField {
                name: e.name.clone(),
                origin: CarrierOrigin::Inherited(e.declared_by),
            })
            .collect();
    }

    let mut fields: Vec<CarrierField> = contract
        .events
        .iter()
        .map(|e| CarrierField {
            name: e.name.clone(),
            origin: CarrierOrigin::Synthesized,
        })
        .collect();
    let carrier = contract.carrier.name();
    if !fields.iter().any(|f| f.name == carrier) {
        fields.push(CarrierField {
            name: carrier.to_string(),
            origin: CarrierOrigin::Synthesized,
        });
    }
    fields
}
