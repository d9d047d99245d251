//! Structural integrity audit.
//!
//! Cross-checks the object table, the parent-set relation, every group's
//! child map, the root table and the identity registry. A clean store yields
//! no violations; any violation points at a defect in the store itself, not
//! at a caller error.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use strata_types::DataId;

use crate::structure::DataStructure;

/// Result of a structural audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub object_count: usize,
    pub root_count: usize,
    pub edge_count: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during the audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub id: DataId,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A group lists a child that is not registered.
    DanglingChild,
    /// A non-root object has no parent.
    Unreachable,
    /// A group's child map and the parent-set relation disagree.
    ParentSetMismatch,
    /// A child-map key differs from the child's name.
    NameMismatch,
    /// The registry's live set differs from the object table.
    RegistryMismatch,
    /// The containment relation has a cycle through this object.
    Cycle,
    /// A root entry is unregistered or misnamed.
    DanglingRoot,
}

impl DataStructure {
    /// Check every structural invariant and report what is broken.
    pub fn audit(&self) -> AuditReport {
        let mut violations = Vec::new();
        let mut edge_count = 0;
        let ids = self.ids();

        // Child maps against the object table and the parent relation.
        for &id in &ids {
            let Some(group) = self.objects.get(&id).and_then(|o| o.as_group()) else {
                continue;
            };
            for (name, child) in group.iter() {
                edge_count += 1;
                let Some(object) = self.objects.get(&child) else {
                    violations.push(Violation {
                        id,
                        kind: ViolationKind::DanglingChild,
                        description: format!("child {name:?} -> {child} is not registered"),
                    });
                    continue;
                };
                if object.name() != name {
                    violations.push(Violation {
                        id: child,
                        kind: ViolationKind::NameMismatch,
                        description: format!(
                            "listed as {name:?} under {id} but named {:?}",
                            object.name()
                        ),
                    });
                }
                if !self.is_child_of(child, id) {
                    violations.push(Violation {
                        id: child,
                        kind: ViolationKind::ParentSetMismatch,
                        description: format!("listed under {id} but {id} is not in its parent set"),
                    });
                }
            }
        }

        // Parent relation against the child maps; reachability.
        for &id in &ids {
            let Some(parents) = self.parents.get(&id) else {
                violations.push(Violation {
                    id,
                    kind: ViolationKind::ParentSetMismatch,
                    description: "no parent-set entry".into(),
                });
                continue;
            };
            for parent in parents {
                let listed = self
                    .objects
                    .get(parent)
                    .and_then(|o| o.as_group())
                    .is_some_and(|g| g.contains_id(id));
                if !listed {
                    violations.push(Violation {
                        id,
                        kind: ViolationKind::ParentSetMismatch,
                        description: format!("{parent} is in the parent set but does not list it"),
                    });
                }
            }
            if parents.is_empty() && !self.is_root(id) {
                violations.push(Violation {
                    id,
                    kind: ViolationKind::Unreachable,
                    description: "no parent and not a root".into(),
                });
            }
        }
        for id in self.parents.keys() {
            if !self.objects.contains_key(id) {
                violations.push(Violation {
                    id: *id,
                    kind: ViolationKind::ParentSetMismatch,
                    description: "parent-set entry for an unregistered object".into(),
                });
            }
        }

        // Registry.
        let live: BTreeSet<DataId> = self.registry.live_ids().collect();
        let registered: BTreeSet<DataId> = ids.iter().copied().collect();
        for id in live.symmetric_difference(&registered) {
            violations.push(Violation {
                id: *id,
                kind: ViolationKind::RegistryMismatch,
                description: if live.contains(id) {
                    "live in the registry but not registered".into()
                } else {
                    "registered but not live in the registry".into()
                },
            });
        }

        // Roots.
        for (name, id) in &self.roots {
            let matches = self.objects.get(id).is_some_and(|o| o.name() == name);
            if !matches {
                violations.push(Violation {
                    id: *id,
                    kind: ViolationKind::DanglingRoot,
                    description: format!("root entry {name:?} does not resolve to an object with that name"),
                });
            }
        }

        for id in self.cyclic_objects(&ids) {
            violations.push(Violation {
                id,
                kind: ViolationKind::Cycle,
                description: "part of a containment cycle".into(),
            });
        }

        AuditReport {
            object_count: self.objects.len(),
            root_count: self.roots.len(),
            edge_count,
            violations,
        }
    }

    /// Kahn's algorithm over the containment edges. Objects never released
    /// from the in-degree queue sit on, or below, a cycle.
    fn cyclic_objects(&self, ids: &[DataId]) -> Vec<DataId> {
        let mut in_degree: BTreeMap<DataId, usize> = ids.iter().map(|id| (*id, 0)).collect();
        for &id in ids {
            for child in self.children_of(id) {
                if let Some(degree) = in_degree.get_mut(&child) {
                    *degree += 1;
                }
            }
        }
        let mut queue: VecDeque<DataId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut released = BTreeSet::new();
        while let Some(id) = queue.pop_front() {
            released.insert(id);
            for child in self.children_of(id) {
                if let Some(degree) = in_degree.get_mut(&child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }
        ids.iter().copied().filter(|id| !released.contains(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::DataPath;

    fn sample() -> DataStructure {
        let mut ds = DataStructure::new();
        let g = ds.create_group("G", None).unwrap();
        let a = ds.create_group("A", Some(g)).unwrap();
        let b = ds.create_group("B", Some(g)).unwrap();
        let x = ds.create_group("X", Some(a)).unwrap();
        ds.add_additional_parent(x, b).unwrap();
        ds
    }

    #[test]
    fn clean_store_has_no_violations() {
        let report = sample().audit();
        assert!(report.is_valid(), "{:?}", report.violations);
        assert_eq!(report.object_count, 4);
        assert_eq!(report.root_count, 1);
        assert_eq!(report.edge_count, 4);
    }

    #[test]
    fn detects_dangling_child() {
        let mut ds = sample();
        let x = ds.get_id(&DataPath::new(["G", "A", "X"])).unwrap();
        ds.objects.remove(&x);
        let kinds: Vec<ViolationKind> = ds.audit().violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::DanglingChild));
        assert!(kinds.contains(&ViolationKind::RegistryMismatch));
    }

    #[test]
    fn detects_one_sided_edge() {
        let mut ds = sample();
        let a = ds.get_id(&DataPath::new(["G", "A"])).unwrap();
        let x = ds.get_id(&DataPath::new(["G", "A", "X"])).unwrap();
        ds.parents.get_mut(&x).unwrap().remove(&a);
        let report = ds.audit();
        assert!(report
            .violations
            .iter()
            .any(|v| v.id == x && v.kind == ViolationKind::ParentSetMismatch));
    }

    #[test]
    fn detects_unreachable_and_cycle() {
        let mut ds = sample();
        let g = ds.get_id(&DataPath::new(["G"])).unwrap();
        let x = ds.get_id(&DataPath::new(["G", "A", "X"])).unwrap();
        ds.roots.clear();
        ds.group_mut(x).unwrap().insert("G".into(), g);
        ds.parents.get_mut(&g).unwrap().insert(x);

        let kinds: Vec<ViolationKind> = ds.audit().violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::Cycle));

        let mut lone = DataStructure::new();
        let orphan = lone.create_group("orphan", None).unwrap();
        lone.roots.clear();
        let report = lone.audit();
        assert_eq!(report.violations[0].id, orphan);
        assert_eq!(report.violations[0].kind, ViolationKind::Unreachable);
    }

    #[test]
    fn detects_misnamed_root() {
        let mut ds = sample();
        let g = ds.get_id(&DataPath::new(["G"])).unwrap();
        ds.roots.insert("Other".into(), g);
        assert!(ds
            .audit()
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::DanglingRoot));
    }
}
