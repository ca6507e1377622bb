//! VehicleId - identifier of one reporting vehicle
//!
//! Derived from the UDP port a listener is bound to, never from packet
//! content. Uses Arc<str> internally for O(1) clone operations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Vehicle identifier with cheap cloning.
///
/// Every packet crossing the shared queue carries one of these, so
/// cloning only bumps a reference count.
///
/// # Examples
/// ```
/// use contracts::VehicleId;
///
/// let id = VehicleId::from_port(5030);
/// assert_eq!(id, "5030");
/// assert_eq!(id.display_name(), "Car-5030");
/// ```
#[derive(Clone, Default)]
pub struct VehicleId(Arc<str>);

impl VehicleId {
    /// Create a new VehicleId from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Identifier for the listener bound to `port`.
    pub fn from_port(port: u16) -> Self {
        Self(Arc::from(port.to_string()))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name used for logs and export destinations.
    pub fn display_name(&self) -> String {
        format!("Car-{}", self.0)
    }
}

impl Deref for VehicleId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for VehicleId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VehicleId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VehicleId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for VehicleId {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<u16> for VehicleId {
    #[inline]
    fn from(port: u16) -> Self {
        Self::from_port(port)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleId({:?})", self.0)
    }
}

impl PartialEq for VehicleId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for VehicleId {}

impl PartialEq<str> for VehicleId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for VehicleId {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

// Must hash like str so HashMap<VehicleId, _> can be queried with &str
impl Hash for VehicleId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Serialize for VehicleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_port() {
        let id = VehicleId::from_port(5031);
        assert_eq!(id.as_str(), "5031");
        assert_eq!(id, VehicleId::from(5031u16));
        assert_eq!(id.display_name(), "Car-5031");
    }

    #[test]
    fn test_clone_shares_storage() {
        let id1 = VehicleId::from_port(5030);
        let id2 = id1.clone();
        assert_eq!(id1.as_str().as_ptr(), id2.as_str().as_ptr());
    }

    #[test]
    fn test_hashmap_lookup_by_str() {
        let mut map: HashMap<VehicleId, usize> = HashMap::new();
        map.insert(VehicleId::from_port(5030), 1);
        map.insert(VehicleId::from_port(5031), 2);

        assert_eq!(map.get("5030"), Some(&1));
        assert_eq!(map.get("5031"), Some(&2));
        assert_eq!(map.get("5032"), None);
    }

    #[test]
    fn test_serde() {
        let id = VehicleId::from_port(5030);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5030\"");

        let parsed: VehicleId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
