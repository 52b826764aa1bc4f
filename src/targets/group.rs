//! Target Group
//!
//! One scrapeable group in the Prometheus HTTP SD wire format:
//!
//! ```json
//! {"targets": ["10.0.10.2:9100"], "labels": {"job": "node"}}
//! ```
//!
//! Equality is structural. Addresses compare element-for-element in order,
//! labels compare as a set of key/value pairs. The registry relies on this for
//! both deduplication and removal matching.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Target Group
// =============================================================================

/// A set of scrape addresses plus the labels attached to all of them
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetGroup {
    /// Scrape addresses (`host:port`), order preserved, duplicates allowed
    pub targets: Vec<String>,
    /// Labels applied to every address in the group
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl TargetGroup {
    /// Create a group from addresses and labels
    pub fn new<T, L, K, V>(targets: T, labels: L) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        L: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Create a group with no labels
    pub fn unlabeled<T>(targets: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            labels: BTreeMap::new(),
        }
    }

    /// Return a copy of this group with one more label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Scrape addresses
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Label set
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Look up a single label
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.targets.join(", "))?;
        if !self.labels.is_empty() {
            let labels: Vec<String> = self
                .labels
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, v))
                .collect();
            write!(f, "{{{}}}", labels.join(", "))?;
        }
        Ok(())
    }
}

// =============================================================================
// Target List
// =============================================================================

/// Request body for adding or removing several groups at once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetList {
    pub targets: Vec<TargetGroup>,
}

impl TargetList {
    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(group: &TargetGroup) -> u64 {
        let mut hasher = DefaultHasher::new();
        group.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_label_order_is_irrelevant() {
        let a: TargetGroup =
            serde_json::from_str(r#"{"targets":["a:9100"],"labels":{"x":"1","y":"2"}}"#).unwrap();
        let b: TargetGroup =
            serde_json::from_str(r#"{"targets":["a:9100"],"labels":{"y":"2","x":"1"}}"#).unwrap();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_address_order_matters() {
        let a = TargetGroup::unlabeled(["a:9100", "b:9100"]);
        let b = TargetGroup::unlabeled(["b:9100", "a:9100"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_addresses_different_labels() {
        let a = TargetGroup::new(["a:9100"], [("job", "node")]);
        let b = TargetGroup::new(["a:9100"], [("job", "dcgm")]);
        let c = TargetGroup::unlabeled(["a:9100"]);

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_duplicate_addresses_are_kept() {
        let group = TargetGroup::unlabeled(["a:9100", "a:9100"]);
        assert_eq!(group.targets().len(), 2);
        assert_ne!(group, TargetGroup::unlabeled(["a:9100"]));
    }

    #[test]
    fn test_empty_group_is_valid() {
        let group: TargetGroup = serde_json::from_str(r#"{"targets":[],"labels":{}}"#).unwrap();
        assert!(group.targets().is_empty());
        assert!(group.labels().is_empty());
        assert_eq!(group, TargetGroup::default());
    }

    #[test]
    fn test_missing_labels_default_to_empty() {
        let group: TargetGroup = serde_json::from_str(r#"{"targets":["a:9100"]}"#).unwrap();
        assert_eq!(group, TargetGroup::unlabeled(["a:9100"]));
    }

    #[test]
    fn test_missing_targets_rejected() {
        let result = serde_json::from_str::<TargetGroup>(r#"{"labels":{"job":"node"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_string_label_rejected() {
        let result =
            serde_json::from_str::<TargetGroup>(r#"{"targets":["a:9100"],"labels":{"port":9100}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let group = TargetGroup::new(["10.0.10.2:9100"], [("__meta_datacenter", "london")]);
        let json = serde_json::to_string(&group).unwrap();
        assert_eq!(
            json,
            r#"{"targets":["10.0.10.2:9100"],"labels":{"__meta_datacenter":"london"}}"#
        );
    }

    #[test]
    fn test_with_label_and_lookup() {
        let group = TargetGroup::unlabeled(["a:9100"])
            .with_label("job", "node")
            .with_label("dc", "london");

        assert_eq!(group.label("job"), Some("node"));
        assert_eq!(group.label("dc"), Some("london"));
        assert_eq!(group.label("missing"), None);
    }

    #[test]
    fn test_display() {
        let group = TargetGroup::new(["a:9100", "b:9100"], [("job", "node")]);
        assert_eq!(group.to_string(), r#"[a:9100, b:9100]{job="node"}"#);
        assert_eq!(TargetGroup::unlabeled(["a:9100"]).to_string(), "[a:9100]");
    }

    #[test]
    fn test_target_list_decode() {
        let list: TargetList = serde_json::from_str(
            r#"{"targets":[{"targets":["a:9100"],"labels":{"job":"node"}},{"targets":["b:9400"]}]}"#,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.targets[0].label("job"), Some("node"));
        assert!(list.targets[1].labels().is_empty());
    }
}
