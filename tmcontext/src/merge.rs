//! Left-fold merging of partial request contexts.
//!
//! `tags` concatenate, `externalRefs` and `metadata` shallow-merge with later
//! keys winning, every other field is last-write-wins. Absent contexts are
//! skipped. The fold is associative for the collection fields only, so callers
//! must keep arguments in left-to-right order.
//!
//! ```rust
//! use serde_json::json;
//! use tmcontext::{RequestContext, merge_contexts};
//!
//! let first = RequestContext::new().with_tag("a").with_metadata("key", 1);
//! let second = RequestContext::new()
//!     .with_tag("b")
//!     .with_metadata("foo", "bar")
//!     .with_user_id("u1");
//!
//! let merged = merge_contexts([Some(&first), Some(&second)]);
//! assert_eq!(merged.tags, vec!["a", "b"]);
//! assert_eq!(merged.metadata.get("foo"), Some(&json!("bar")));
//! assert_eq!(merged.field("userId"), Some(&json!("u1")));
//! ```

use crate::RequestContext;

pub fn merge_contexts<'a, I>(contexts: I) -> RequestContext
where
    I: IntoIterator<Item = Option<&'a RequestContext>>,
{
    contexts
        .into_iter()
        .flatten()
        .fold(RequestContext::default(), RequestContext::merge)
}

impl RequestContext {
    pub fn merge(mut self, other: &RequestContext) -> RequestContext {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
        self.tags.extend(other.tags.iter().cloned());
        for (key, value) in &other.external_refs {
            self.external_refs.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.metadata {
            self.metadata.insert(key.clone(), value.clone());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merges_tags_metadata_and_fields() {
        let first = RequestContext::new().with_tag("a").with_metadata("key", 1);
        let second = RequestContext::new()
            .with_tag("b")
            .with_metadata("foo", "bar")
            .with_user_id("u1");

        let merged = merge_contexts([Some(&first), Some(&second)]);

        assert_eq!(
            merged.to_value(),
            json!({
                "tags": ["a", "b"],
                "metadata": { "key": 1, "foo": "bar" },
                "userId": "u1"
            })
        );
    }

    #[test]
    fn absent_contexts_are_skipped() {
        let only = RequestContext::new().with_tag("a");
        let merged = merge_contexts([None, Some(&only), None]);

        assert_eq!(merged.tags, vec!["a".to_string()]);
        assert!(merged.external_refs.is_empty());
        assert!(merged.metadata.is_empty());
    }

    #[test]
    fn no_contexts_yield_empty_accumulator() {
        let merged = merge_contexts(std::iter::empty());
        assert_eq!(merged, RequestContext::default());
    }

    #[test]
    fn later_values_override_same_keys() {
        let first = RequestContext::new()
            .with_route("/old")
            .with_external_ref("ticket", "T-1")
            .with_metadata("attempt", 1);
        let second = RequestContext::new()
            .with_route("/new")
            .with_external_ref("ticket", "T-2")
            .with_metadata("attempt", 2);

        let merged = merge_contexts([Some(&first), Some(&second)]);

        assert_eq!(merged.field("route"), Some(&json!("/new")));
        assert_eq!(merged.external_refs.get("ticket"), Some(&json!("T-2")));
        assert_eq!(merged.metadata.get("attempt"), Some(&json!(2)));
    }

    #[test]
    fn duplicate_tags_are_preserved_in_order() {
        let first = RequestContext::new().with_tags(["x", "y"]);
        let second = RequestContext::new().with_tags(["y", "x"]);

        let merged = merge_contexts([Some(&first), Some(&second)]);
        assert_eq!(merged.tags, vec!["x", "y", "y", "x"]);
    }
}
