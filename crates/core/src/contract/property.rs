//! Property declarations
//!
//! A [`PropertyDef`] names a property, its declared [`ValueType`] and the two
//! accessor slots. Each slot is [`Slot::Missing`] (no accessor),
//! [`Slot::Abstract`] (declared without a body) or [`Slot::Concrete`] (a base
//! implementation operating on the instance's [`BaseState`]).

use super::base_state::BaseState;
use crate::value::{Value, ValueType};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Base getter body
pub type Getter = Arc<dyn Fn(&BaseState) -> Value + Send + Sync>;

/// Base setter body
pub type Setter = Arc<dyn Fn(&BaseState, Value) + Send + Sync>;

/// An accessor slot on a declared property
pub enum Slot<F> {
    /// No accessor of this kind
    Missing,
    /// Declared without a body
    Abstract,
    /// Base implementation
    Concrete(F),
}

/// Shape of a [`Slot`], without its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// No accessor
    Missing,
    /// Declared without a body
    Abstract,
    /// Has a base implementation
    Concrete,
}

impl<F> Slot<F> {
    /// Shape of this slot
    pub fn kind(&self) -> SlotKind {
        match self {
            Slot::Missing => SlotKind::Missing,
            Slot::Abstract => SlotKind::Abstract,
            Slot::Concrete(_) => SlotKind::Concrete,
        }
    }

    /// True unless the slot is `Missing`
    pub fn is_present(&self) -> bool {
        !matches!(self, Slot::Missing)
    }

    /// The base body, if any
    pub fn concrete(&self) -> Option<&F> {
        match self {
            Slot::Concrete(f) => Some(f),
            _ => None,
        }
    }

    /// Drop the body while keeping the slot declared
    pub fn into_abstract(self) -> Self {
        match self {
            Slot::Missing => Slot::Missing,
            Slot::Abstract | Slot::Concrete(_) => Slot::Abstract,
        }
    }
}

impl<F: Clone> Clone for Slot<F> {
    fn clone(&self) -> Self {
        match self {
            Slot::Missing => Slot::Missing,
            Slot::Abstract => Slot::Abstract,
            Slot::Concrete(f) => Slot::Concrete(f.clone()),
        }
    }
}

impl<F> fmt::Debug for Slot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind(), f)
    }
}

impl<F> Serialize for Slot<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.kind().serialize(serializer)
    }
}

/// Structural identity of a property, used to dedupe members discovered
/// through several interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertySignature {
    /// Property name
    pub name: String,
    /// Declared value type
    pub value_type: ValueType,
    /// Has a getter
    pub gettable: bool,
    /// Has a setter
    pub settable: bool,
}

/// A property declared by a contract
#[derive(Clone, Debug)]
pub struct PropertyDef {
    name: String,
    value_type: ValueType,
    getter: Slot<Getter>,
    setter: Slot<Setter>,
    overridable: bool,
    initializer: Option<Value>,
    base_field: Option<String>,
}

impl PropertyDef {
    /// Auto-implemented property stored in a base field of the same name.
    ///
    /// The base field starts at the initializer, or the type's default value.
    pub fn auto(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        let read_field = name.clone();
        let write_field = name.clone();
        Self {
            getter: Slot::Concrete(Arc::new(move |state: &BaseState| state.get(&read_field))),
            setter: Slot::Concrete(Arc::new(move |state: &BaseState, value: Value| {
                state.set(&write_field, value)
            })),
            base_field: Some(name.clone()),
            name,
            value_type,
            overridable: true,
            initializer: None,
        }
    }

    /// Property with abstract getter and setter (interface members, abstract
    /// class members).
    pub fn abstract_property(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            getter: Slot::Abstract,
            setter: Slot::Abstract,
            overridable: true,
            initializer: None,
            base_field: None,
        }
    }

    /// Property with hand-written base accessors.
    pub fn custom<G, S>(name: impl Into<String>, value_type: ValueType, getter: G, setter: S) -> Self
    where
        G: Fn(&BaseState) -> Value + Send + Sync + 'static,
        S: Fn(&BaseState, Value) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            value_type,
            getter: Slot::Concrete(Arc::new(getter)),
            setter: Slot::Concrete(Arc::new(setter)),
            overridable: true,
            initializer: None,
            base_field: None,
        }
    }

    /// Replace the getter with a base implementation
    pub fn with_getter<G>(mut self, getter: G) -> Self
    where
        G: Fn(&BaseState) -> Value + Send + Sync + 'static,
    {
        self.getter = Slot::Concrete(Arc::new(getter));
        self
    }

    /// Replace the setter with a base implementation
    pub fn with_setter<S>(mut self, setter: S) -> Self
    where
        S: Fn(&BaseState, Value) + Send + Sync + 'static,
    {
        self.setter = Slot::Concrete(Arc::new(setter));
        self
    }

    /// Remove the setter
    pub fn read_only(mut self) -> Self {
        self.setter = Slot::Missing;
        self
    }

    /// Remove the getter
    pub fn write_only(mut self) -> Self {
        self.getter = Slot::Missing;
        self
    }

    /// Mark the accessors as non-overridable
    pub fn sealed(mut self) -> Self {
        self.overridable = false;
        self
    }

    /// Declared initializer.
    ///
    /// The initializer is the notification baseline: writing the same value
    /// first is not a change. Custom accessors must name the field they use
    /// with [`initial_in`](Self::initial_in) instead.
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initializer = Some(value.into());
        self
    }

    /// Declared initializer stored in base field `field`, the field the
    /// custom accessors read and write.
    pub fn initial_in(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base_field = Some(field.into());
        self.initializer = Some(value.into());
        self
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Getter slot
    pub fn getter(&self) -> &Slot<Getter> {
        &self.getter
    }

    /// Setter slot
    pub fn setter(&self) -> &Slot<Setter> {
        &self.setter
    }

    /// Whether the accessors can be re-routed by a proxy
    pub fn is_overridable(&self) -> bool {
        self.overridable
    }

    /// Declared initializer
    pub fn initializer(&self) -> Option<&Value> {
        self.initializer.as_ref()
    }

    /// Base field holding the value (auto-properties, `initial_in`)
    pub fn base_field(&self) -> Option<&str> {
        self.base_field.as_deref()
    }

    /// Structural identity of this property
    pub fn signature(&self) -> PropertySignature {
        PropertySignature {
            name: self.name.clone(),
            value_type: self.value_type,
            gettable: self.getter.is_present(),
            settable: self.setter.is_present(),
        }
    }
}
