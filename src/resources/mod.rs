//! The backend's resource collections and their payloads.

mod api;
pub mod fixtures;
pub mod models;

pub use api::ResourceApi;
pub use models::*;

use serde_json::Value;
use std::fmt;

/// One REST collection of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Staff,
    Customer,
    MenuItem,
    Order,
    OrderItem,
    Reservation,
    Authority,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::User,
        Resource::Staff,
        Resource::Customer,
        Resource::MenuItem,
        Resource::Order,
        Resource::OrderItem,
        Resource::Reservation,
        Resource::Authority,
    ];

    /// Collection path relative to the API root.
    pub fn path(self) -> &'static str {
        match self {
            Resource::User => "/admin/users",
            Resource::Staff => "/staff",
            Resource::Customer => "/customers",
            Resource::MenuItem => "/menu-items",
            Resource::Order => "/orders",
            Resource::OrderItem => "/order-items",
            Resource::Reservation => "/reservations",
            Resource::Authority => "/authorities",
        }
    }

    /// Body field holding the value used to address a single entity.
    pub fn key_field(self) -> &'static str {
        match self {
            Resource::User => "login",
            Resource::Authority => "name",
            _ => "id",
        }
    }

    /// Item path with the key as a single percent-encoded segment.
    pub fn item_path(self, key: &ResourceKey) -> String {
        match key {
            ResourceKey::Id(id) => format!("{}/{}", self.path(), id),
            ResourceKey::Name(name) => {
                format!("{}/{}", self.path(), urlencoding::encode(name))
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Staff => "staff",
            Resource::Customer => "customer",
            Resource::MenuItem => "menu item",
            Resource::Order => "order",
            Resource::OrderItem => "order item",
            Resource::Reservation => "reservation",
            Resource::Authority => "authority",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Server-assigned identifier of a single entity: a numeric id, or a login
/// / authority name for the string-keyed collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Id(i64),
    Name(String),
}

impl ResourceKey {
    /// Reads a key out of a JSON value. Empty strings are not keys.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ResourceKey::Id),
            Value::String(s) if !s.is_empty() => Some(ResourceKey::Name(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ResourceKey::Id(id) => Value::from(*id),
            ResourceKey::Name(name) => Value::from(name.as_str()),
        }
    }

    pub fn as_id(&self) -> Option<i64> {
        match self {
            ResourceKey::Id(id) => Some(*id),
            ResourceKey::Name(_) => None,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Id(id) => write!(f, "{}", id),
            ResourceKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ResourceKey {
    fn from(name: &str) -> Self {
        ResourceKey::Name(name.to_string())
    }
}
