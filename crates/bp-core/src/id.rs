use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Interner backing every canvas id.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Process-wide counter mixed into generated IDs so two IDs minted in the
/// same millisecond still differ.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A lightweight, interned identifier for canvas nodes, edges and edge actions.
/// Wraps a `Spur`, so it is `Copy` and compares and hashes as an integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

/// Edges share the node id space (and interner).
pub type EdgeId = NodeId;

impl NodeId {
    /// Intern a new string as a NodeId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique ID of the form `<prefix>-<millis>-<counter>`,
    /// e.g. `page-1718000000000-3`.
    pub fn generate(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}-{}-{n}", now_millis()))
    }

    /// Derive the ID of a pasted copy from the original ID, the paste
    /// operation's stamp and the copy's position in the pasted batch.
    pub fn derive_copy(original: NodeId, stamp: u64, index: usize) -> Self {
        Self::intern(&format!("{}-copy-{stamp}-{index}", original.as_str()))
    }
}

/// Milliseconds since the Unix epoch (0 if the clock is before the epoch).
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("login_page");
        let b = NodeId::intern("login_page");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "login_page");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = NodeId::generate("page");
        let b = NodeId::generate("page");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("page-"));
    }

    #[test]
    fn derived_copy_ids_differ_by_stamp_and_index() {
        let orig = NodeId::intern("card");
        let a = NodeId::derive_copy(orig, 10, 0);
        let b = NodeId::derive_copy(orig, 10, 1);
        let c = NodeId::derive_copy(orig, 11, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "card-copy-10-0");
    }

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(NodeId::intern("n1").to_string(), "n1");
        assert_eq!(format!("{:?}", NodeId::intern("n1")), "#n1");
    }
}
