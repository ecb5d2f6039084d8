//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use tmcommon::{DecisionId, Registry};
//!
//! let decision = DecisionId::new("dec_123").expect("id should be non-empty");
//! let mut registry = Registry::new();
//! registry.insert("open".to_string(), 1_u32);
//!
//! assert_eq!(decision.as_str(), "dec_123");
//! assert_eq!(registry.get("open"), Some(&1));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use tmcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod decision {
    //! Opaque decision identifier newtype.
    //!
    //! ```rust
    //! use tmcommon::DecisionId;
    //!
    //! let id = DecisionId::new("dec_42").expect("non-empty id");
    //! assert_eq!(id.to_string(), "dec_42");
    //! assert!(DecisionId::new("   ").is_none());
    //! ```

    use std::fmt::{Display, Formatter};

    /// Ledger-issued identifier threaded through every call against one decision.
    ///
    /// Never empty. The ledger owns its format; it is not parsed here.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct DecisionId(String);

    impl DecisionId {
        pub fn new(value: impl Into<String>) -> Option<Self> {
            let value = value.into();
            if value.trim().is_empty() {
                return None;
            }

            Some(Self(value))
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }

        pub fn into_inner(self) -> String {
            self.0
        }
    }

    impl Display for DecisionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl AsRef<str> for DecisionId {
        fn as_ref(&self) -> &str {
            self.as_str()
        }
    }
}

pub mod registry {
    //! Insertion-ordered registry map used by the tool registry.
    //!
    //! ```rust
    //! use tmcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //! registry.insert("beta".to_string(), 2_u32);
    //!
    //! assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["alpha", "beta"]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
        order: Vec<K>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
                order: Vec::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash + Clone,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            let previous = self.items.insert(key.clone(), value);
            if previous.is_none() {
                self.order.push(key);
            }
            previous
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            let removed = self.items.remove(key);
            if removed.is_some() {
                self.order
                    .retain(|existing| <K as Borrow<Q>>::borrow(existing) != key);
            }
            removed
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.order.iter()
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.order.iter().filter_map(|key| self.items.get(key))
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use decision::DecisionId;
pub use future::BoxFuture;
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use super::{DecisionId, Registry};

    #[test]
    fn decision_id_rejects_blank_values() {
        assert!(DecisionId::new("").is_none());
        assert!(DecisionId::new("  \t").is_none());

        let id = DecisionId::new("dec_1").expect("id should build");
        assert_eq!(id.as_str(), "dec_1");
        assert_eq!(id.to_string(), "dec_1");
        assert_eq!(id.into_inner(), "dec_1");
    }

    #[test]
    fn registry_preserves_insertion_order() {
        let mut registry = Registry::new();
        registry.insert("b".to_string(), 2_u32);
        registry.insert("a".to_string(), 1_u32);
        registry.insert("b".to_string(), 3_u32);

        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(registry.values().copied().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn generic_registry_basic_lifecycle() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.insert("alpha".to_string(), 1_u32);
        assert_eq!(registry.get("alpha"), Some(&1));
        assert!(registry.contains_key("alpha"));
        assert_eq!(registry.len(), 1);

        let removed = registry.remove("alpha");
        assert_eq!(removed, Some(1));
        assert!(registry.is_empty());
        assert_eq!(registry.keys().count(), 0);
    }
}
