use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a certificate in the manifest tree, e.g. `/0/3/1/`
///
/// The root is `/`; every child appends its 0-based index among the
/// certificates listed on its parent's manifest. Paths are unique within a
/// run and one path is a prefix of another exactly when the first names an
/// ancestor of the second.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReachabilityPath(String);

impl ReachabilityPath {
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Wrap an existing path; a missing trailing slash is added
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }
        Self(path)
    }

    pub fn child(&self, index: usize) -> Self {
        Self(format!("{}{}/", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of edges from the root
    pub fn depth(&self) -> usize {
        self.0.matches('/').count().saturating_sub(1)
    }

    /// Distinct paths where one is a prefix of the other
    pub fn is_ancestor_related(&self, other: &ReachabilityPath) -> bool {
        self.0 != other.0 && (self.0.starts_with(&other.0) || other.0.starts_with(&self.0))
    }
}

impl fmt::Display for ReachabilityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_paths() {
        let root = ReachabilityPath::root();
        let child = root.child(0).child(3).child(1);
        assert_eq!(child.as_str(), "/0/3/1/");
        assert_eq!(child.depth(), 3);
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn test_ancestor_relation_is_symmetric() {
        let parent = ReachabilityPath::new("/0/");
        let child = ReachabilityPath::new("/0/2/");
        assert!(parent.is_ancestor_related(&child));
        assert!(child.is_ancestor_related(&parent));
        assert!(ReachabilityPath::root().is_ancestor_related(&child));
    }

    #[test]
    fn test_siblings_and_self_are_unrelated() {
        // Trailing slash keeps /1/ from being a prefix of /10/
        let one = ReachabilityPath::new("/1");
        let ten = ReachabilityPath::new("/10");
        assert!(!one.is_ancestor_related(&ten));
        assert!(!one.is_ancestor_related(&one.clone()));
    }
}
