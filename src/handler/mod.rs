//! Custom value converters attached to entity properties.

pub mod factory;

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::cache::ClassProperty;
use crate::core::{Result, Value};

pub use factory::HandlerFactory;

/// Converts values between their database and entity representations.
///
/// One instance per handler type is shared across every property that refers to
/// it, so implementations must be stateless or internally synchronized.
pub trait PropertyHandler: Send + Sync + 'static {
    /// Database value -> entity value, applied when materializing rows.
    fn get(&self, input: Value, property: &ClassProperty) -> Result<Value>;

    /// Entity value -> database value, applied when binding parameters.
    fn set(&self, input: Value, property: &ClassProperty) -> Result<Value>;
}

/// Identifies a handler type without naming it generically.
#[derive(Clone, Copy)]
pub struct HandlerKey {
    id: TypeId,
    name: &'static str,
}

impl HandlerKey {
    pub fn of<H: PropertyHandler>() -> Self {
        Self {
            id: TypeId::of::<H>(),
            name: std::any::type_name::<H>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for HandlerKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HandlerKey {}

impl Hash for HandlerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerKey({})", self.name)
    }
}
