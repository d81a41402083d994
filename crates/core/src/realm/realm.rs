use std::path::PathBuf;
use std::sync::Arc;

/// How a realm resolves resources relative to its parent.
///
/// Provider realms always use [`Delegation::ParentFirst`] so host classes
/// win over same-named copies shaded into a runtime's classpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    ParentFirst,
    SelfFirst,
}

/// An isolated classpath boundary.
///
/// A provider realm holds the resolved classpath of exactly one runtime
/// version and is parented to the host. Component realms are children of a
/// provider realm and may carry extra entries invisible to sibling realms.
#[derive(Debug)]
pub struct Realm {
    id: String,
    delegation: Delegation,
    entries: Vec<PathBuf>,
    parent: Option<Arc<Realm>>,
}

impl Realm {
    pub(crate) fn new(
        id: impl Into<String>,
        delegation: Delegation,
        entries: Vec<PathBuf>,
        parent: Option<Arc<Realm>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            delegation,
            entries,
            parent,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn delegation(&self) -> Delegation {
        self.delegation
    }

    /// Classpath entries owned by this realm, in resolution order
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn parent(&self) -> Option<&Arc<Realm>> {
        self.parent.as_ref()
    }

    /// Locate a resource by relative name, honoring the delegation mode.
    ///
    /// Directory entries are probed for `entry/name`; file entries match on
    /// their file name.
    pub fn find_resource(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim_start_matches('/');
        match self.delegation {
            Delegation::ParentFirst => self
                .parent
                .as_ref()
                .and_then(|p| p.find_resource(name))
                .or_else(|| self.find_local(name)),
            Delegation::SelfFirst => self
                .find_local(name)
                .or_else(|| self.parent.as_ref().and_then(|p| p.find_resource(name))),
        }
    }

    fn find_local(&self, name: &str) -> Option<PathBuf> {
        for entry in &self.entries {
            if entry.is_dir() {
                let candidate = entry.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            } else if entry.file_name().and_then(|n| n.to_str()) == Some(name) {
                return Some(entry.clone());
            }
        }
        None
    }

    /// The full classpath visible from this realm, parent entries first
    pub fn visible_classpath(&self) -> Vec<PathBuf> {
        let mut entries = match &self.parent {
            Some(parent) => parent.visible_classpath(),
            None => Vec::new(),
        };
        entries.extend(self.entries.iter().cloned());
        entries
    }

    /// True when `other` is this realm or one of its ancestors
    pub fn is_descendant_of(&self, other: &Realm) -> bool {
        if self.id == other.id {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.is_descendant_of(other),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parent_first_prefers_parent_entries() {
        let dir = tempfile::tempdir().unwrap();
        let parent_dir = dir.path().join("parent");
        let child_dir = dir.path().join("child");
        fs::create_dir_all(&parent_dir).unwrap();
        fs::create_dir_all(&child_dir).unwrap();
        fs::write(parent_dir.join("shared.txt"), "parent").unwrap();
        fs::write(child_dir.join("shared.txt"), "child").unwrap();

        let parent = Realm::new("parent", Delegation::ParentFirst, vec![parent_dir.clone()], None);
        let child = Realm::new(
            "child",
            Delegation::ParentFirst,
            vec![child_dir.clone()],
            Some(parent.clone()),
        );

        assert_eq!(child.find_resource("shared.txt").unwrap(), parent_dir.join("shared.txt"));

        let greedy = Realm::new("greedy", Delegation::SelfFirst, vec![child_dir.clone()], Some(parent));
        assert_eq!(greedy.find_resource("shared.txt").unwrap(), child_dir.join("shared.txt"));
    }

    #[test]
    fn file_entries_match_on_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("runtime-1.7.jar");
        fs::write(&jar, b"").unwrap();

        let realm = Realm::new("r", Delegation::ParentFirst, vec![jar.clone()], None);
        assert_eq!(realm.find_resource("runtime-1.7.jar").unwrap(), jar);
        assert!(realm.find_resource("missing.jar").is_none());
    }

    #[test]
    fn visible_classpath_orders_parent_first() {
        let parent = Realm::new("p", Delegation::ParentFirst, vec![PathBuf::from("/host")], None);
        let child = Realm::new(
            "c",
            Delegation::ParentFirst,
            vec![PathBuf::from("/runtime")],
            Some(parent),
        );
        assert_eq!(
            child.visible_classpath(),
            vec![PathBuf::from("/host"), PathBuf::from("/runtime")]
        );
    }
}
