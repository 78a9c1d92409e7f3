//! Pure operations over the ordered segment tree of a session.
//!
//! Every editing operation returns a fresh tree; the input is never mutated.
//! Failed validations leave the caller's tree untouched.

use crate::model::{Segment, TargetBasis};

/// How many levels of `Repeat` nesting a session may contain. Two levels
/// means a repeat block may itself contain one more repeat, and no further.
pub const MAX_REPEAT_DEPTH: usize = 2;

/// Validation failures raised by tree edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    DuplicateWarmup,
    DuplicateCooldown,
    NestingTooDeep,
    UnknownParent,
}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentError::DuplicateWarmup => {
                write!(f, "A session can only contain one warm-up")
            }
            SegmentError::DuplicateCooldown => {
                write!(f, "A session can only contain one cool-down")
            }
            SegmentError::NestingTooDeep => write!(
                f,
                "Repeats can only be nested {MAX_REPEAT_DEPTH} levels deep"
            ),
            SegmentError::UnknownParent => write!(f, "Parent segment no longer exists"),
        }
    }
}

impl std::error::Error for SegmentError {}

/// Aggregated effort of a tree, split by target basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub duration_s: u32,
    pub distance_m: u32,
}

impl Totals {
    pub fn is_empty(&self) -> bool {
        self.duration_s == 0 && self.distance_m == 0
    }
}

/// Depth-first search for the first node with the given id, at any depth.
pub fn find<'a>(tree: &'a [Segment], id: &str) -> Option<&'a Segment> {
    for seg in tree {
        if seg.id() == id {
            return Some(seg);
        }
        if let Segment::Repeat(r) = seg {
            if let Some(found) = find(&r.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Nesting level of the node with the given id. Top-level nodes are depth 0.
pub fn depth_of(tree: &[Segment], id: &str) -> Option<usize> {
    fn walk(tree: &[Segment], id: &str, depth: usize) -> Option<usize> {
        for seg in tree {
            if seg.id() == id {
                return Some(depth);
            }
            if let Segment::Repeat(r) = seg {
                if let Some(d) = walk(&r.children, id, depth + 1) {
                    return Some(d);
                }
            }
        }
        None
    }
    walk(tree, id, 0)
}

/// Total number of nodes in the tree, containers included.
pub fn count(tree: &[Segment]) -> usize {
    tree.iter()
        .map(|seg| match seg {
            Segment::Effort(_) => 1,
            Segment::Repeat(r) => 1 + count(&r.children),
        })
        .sum()
}

/// Rebuild the tree with the node matching `updated.id()` swapped out.
/// Nodes outside the ancestor chain are preserved as-is.
pub fn replace(tree: &[Segment], updated: &Segment) -> Vec<Segment> {
    tree.iter()
        .map(|seg| {
            if seg.id() == updated.id() {
                updated.clone()
            } else if let Segment::Repeat(r) = seg {
                let mut r = r.clone();
                r.children = replace(&r.children, updated);
                Segment::Repeat(r)
            } else {
                seg.clone()
            }
        })
        .collect()
}

/// Rebuild the tree without the node matching `id`, wherever it occurs.
/// Removing an absent id is a no-op.
pub fn remove(tree: &[Segment], id: &str) -> Vec<Segment> {
    tree.iter()
        .filter(|seg| seg.id() != id)
        .map(|seg| {
            if let Segment::Repeat(r) = seg {
                let mut r = r.clone();
                r.children = remove(&r.children, id);
                Segment::Repeat(r)
            } else {
                seg.clone()
            }
        })
        .collect()
}

/// Insert a segment at the top level according to its kind.
///
/// Warm-ups go first and cool-downs last, each unique per session. Any other
/// segment lands immediately before the cool-down if one exists, otherwise
/// at the end.
pub fn insert(tree: &[Segment], segment: Segment) -> Result<Vec<Segment>, SegmentError> {
    let mut out: Vec<Segment> = tree.to_vec();
    if segment.is_warmup() {
        if tree.iter().any(Segment::is_warmup) {
            return Err(SegmentError::DuplicateWarmup);
        }
        out.insert(0, segment);
    } else if segment.is_cooldown() {
        if tree.iter().any(Segment::is_cooldown) {
            return Err(SegmentError::DuplicateCooldown);
        }
        out.push(segment);
    } else {
        match out.iter().position(Segment::is_cooldown) {
            Some(pos) => out.insert(pos, segment),
            None => out.push(segment),
        }
    }
    Ok(out)
}

/// Whether a repeat block sitting at `parent_depth` may accept a repeat child.
pub fn can_nest_repeat(parent_depth: usize) -> bool {
    parent_depth + 1 < MAX_REPEAT_DEPTH
}

/// Append a child to the repeat block with id `parent_id`.
///
/// Rejects the edit when the parent is missing, when the parent is at the
/// nesting bound, or when the child is a repeat the bound does not allow.
pub fn add_child(
    tree: &[Segment],
    parent_id: &str,
    child: Segment,
) -> Result<Vec<Segment>, SegmentError> {
    let Some(parent_depth) = depth_of(tree, parent_id) else {
        return Err(SegmentError::UnknownParent);
    };
    match find(tree, parent_id) {
        Some(Segment::Repeat(r)) => {
            if child.is_repeat() && !can_nest_repeat(parent_depth) {
                return Err(SegmentError::NestingTooDeep);
            }
            let mut parent = r.clone();
            parent.children.push(child);
            Ok(replace(tree, &Segment::Repeat(parent)))
        }
        _ => Err(SegmentError::UnknownParent),
    }
}

/// Recursively aggregate planned effort. A leaf below a repeat of count N
/// contributes N times its target; nested repeats multiply.
pub fn totals(tree: &[Segment]) -> Totals {
    let mut t = Totals::default();
    for seg in tree {
        match seg {
            Segment::Effort(e) => match e.basis {
                TargetBasis::Time => t.duration_s += e.target,
                TargetBasis::Distance => t.distance_m += e.target,
            },
            Segment::Repeat(r) => {
                let inner = totals(&r.children);
                t.duration_s += inner.duration_s * r.count;
                t.distance_m += inner.distance_m * r.count;
            }
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Effort, EffortKind, Intensity, IntensityBounds, Repeat};

    fn effort(id: &str, kind: EffortKind, basis: TargetBasis, target: u32) -> Segment {
        Segment::Effort(Effort {
            id: id.into(),
            kind,
            basis,
            target,
            intensity: Intensity::None,
        })
    }

    fn repeat(id: &str, count: u32, children: Vec<Segment>) -> Segment {
        Segment::Repeat(Repeat {
            id: id.into(),
            count,
            children,
        })
    }

    /// Warm-up, 15x(30s run / 30s recovery), cool-down.
    fn interval_tree() -> Vec<Segment> {
        vec![
            effort("w", EffortKind::Warmup, TargetBasis::Time, 600),
            repeat(
                "rep",
                15,
                vec![
                    effort("run", EffortKind::Run, TargetBasis::Time, 30),
                    effort("rec", EffortKind::Recovery, TargetBasis::Time, 30),
                ],
            ),
            effort("c", EffortKind::Cooldown, TargetBasis::Time, 600),
        ]
    }

    #[test]
    fn find_reaches_nested_nodes() {
        let tree = interval_tree();
        assert_eq!(find(&tree, "run").map(Segment::id), Some("run"));
        assert_eq!(find(&tree, "rep").map(Segment::id), Some("rep"));
        assert!(find(&tree, "missing").is_none());
    }

    #[test]
    fn depth_of_counts_nesting_levels() {
        let tree = vec![repeat(
            "outer",
            2,
            vec![repeat(
                "inner",
                3,
                vec![effort("leaf", EffortKind::Run, TargetBasis::Time, 30)],
            )],
        )];
        assert_eq!(depth_of(&tree, "outer"), Some(0));
        assert_eq!(depth_of(&tree, "inner"), Some(1));
        assert_eq!(depth_of(&tree, "leaf"), Some(2));
        assert_eq!(depth_of(&tree, "missing"), None);
    }

    #[test]
    fn replace_swaps_node_and_keeps_siblings() {
        let tree = interval_tree();
        let updated = effort("run", EffortKind::Run, TargetBasis::Time, 45);
        let replaced = replace(&tree, &updated);
        assert_eq!(find(&replaced, "run"), Some(&updated));
        // Siblings are structurally unchanged.
        assert_eq!(find(&replaced, "w"), find(&tree, "w"));
        assert_eq!(find(&replaced, "rec"), find(&tree, "rec"));
        assert_eq!(count(&replaced), count(&tree));
    }

    #[test]
    fn remove_drops_one_node_and_is_idempotent() {
        let tree = interval_tree();
        let before = count(&tree);
        let once = remove(&tree, "rec");
        assert!(find(&once, "rec").is_none());
        assert_eq!(count(&once), before - 1);
        let twice = remove(&once, "rec");
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_container_drops_subtree() {
        let tree = interval_tree();
        let out = remove(&tree, "rep");
        assert!(find(&out, "rep").is_none());
        assert!(find(&out, "run").is_none());
        assert_eq!(count(&out), 2);
    }

    #[test]
    fn insert_orders_warmup_first_and_cooldown_last() {
        let mut tree = Vec::new();
        tree = insert(&tree, effort("w", EffortKind::Warmup, TargetBasis::Time, 600)).unwrap();
        tree = insert(&tree, effort("c", EffortKind::Cooldown, TargetBasis::Time, 600)).unwrap();
        tree = insert(&tree, effort("r", EffortKind::Run, TargetBasis::Time, 1200)).unwrap();
        let ids: Vec<&str> = tree.iter().map(Segment::id).collect();
        assert_eq!(ids, vec!["w", "r", "c"]);
    }

    #[test]
    fn insert_rejects_second_warmup_unchanged() {
        let tree = interval_tree();
        let err = insert(
            &tree,
            effort("w2", EffortKind::Warmup, TargetBasis::Time, 300),
        )
        .unwrap_err();
        assert_eq!(err, SegmentError::DuplicateWarmup);
        // Caller's tree is untouched by a failed insert.
        assert_eq!(tree, interval_tree());
    }

    #[test]
    fn insert_rejects_second_cooldown_unchanged() {
        let tree = interval_tree();
        let err = insert(
            &tree,
            effort("c2", EffortKind::Cooldown, TargetBasis::Time, 300),
        )
        .unwrap_err();
        assert_eq!(err, SegmentError::DuplicateCooldown);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree, interval_tree());
    }

    #[test]
    fn add_child_appends_to_repeat() {
        let tree = interval_tree();
        let out = add_child(
            &tree,
            "rep",
            effort("extra", EffortKind::Run, TargetBasis::Time, 60),
        )
        .unwrap();
        assert_eq!(depth_of(&out, "extra"), Some(1));
        assert_eq!(count(&out), count(&tree) + 1);
    }

    #[test]
    fn add_child_enforces_repeat_depth() {
        let tree = vec![repeat("outer", 2, vec![repeat("inner", 2, Vec::new())])];
        // One nested repeat is fine, a second level is not.
        let nested = add_child(&tree, "outer", repeat("ok", 2, Vec::new()));
        assert!(nested.is_ok());
        let err = add_child(&tree, "inner", repeat("deep", 2, Vec::new())).unwrap_err();
        assert_eq!(err, SegmentError::NestingTooDeep);
        // Leaves are still allowed at the bound.
        let leaf = add_child(
            &tree,
            "inner",
            effort("leaf", EffortKind::Run, TargetBasis::Time, 30),
        );
        assert!(leaf.is_ok());
    }

    #[test]
    fn add_child_unknown_parent() {
        let tree = interval_tree();
        let err = add_child(
            &tree,
            "nope",
            effort("x", EffortKind::Run, TargetBasis::Time, 30),
        )
        .unwrap_err();
        assert_eq!(err, SegmentError::UnknownParent);
    }

    #[test]
    fn totals_multiply_repeat_counts() {
        let tree = vec![repeat(
            "rep",
            4,
            vec![effort("run", EffortKind::Run, TargetBasis::Time, 30)],
        )];
        let t = totals(&tree);
        assert_eq!(t.duration_s, 120);
        assert_eq!(t.distance_m, 0);
    }

    #[test]
    fn totals_split_by_basis() {
        let tree = vec![
            effort("a", EffortKind::Run, TargetBasis::Distance, 5000),
            effort("b", EffortKind::Run, TargetBasis::Time, 1200),
        ];
        let t = totals(&tree);
        assert_eq!(t.distance_m, 5000);
        assert_eq!(t.duration_s, 1200);
    }

    #[test]
    fn totals_compound_through_nested_repeats() {
        let tree = vec![repeat(
            "outer",
            3,
            vec![repeat(
                "inner",
                2,
                vec![effort("run", EffortKind::Run, TargetBasis::Distance, 200)],
            )],
        )];
        assert_eq!(totals(&tree).distance_m, 1200);
    }

    #[test]
    fn interval_session_end_to_end() {
        // Empty draft, then warm-up, 15x(30s/30s) repeat, cool-down.
        let mut tree: Vec<Segment> = Vec::new();
        tree = insert(&tree, effort("w", EffortKind::Warmup, TargetBasis::Time, 600)).unwrap();
        let rep = repeat(
            "rep",
            15,
            vec![
                Segment::Effort(Effort {
                    id: "run".into(),
                    kind: EffortKind::Run,
                    basis: TargetBasis::Time,
                    target: 30,
                    intensity: Intensity::Pace(IntensityBounds {
                        min: "3:40".into(),
                        max: "3:50".into(),
                    }),
                }),
                effort("rec", EffortKind::Recovery, TargetBasis::Time, 30),
            ],
        );
        tree = insert(&tree, rep).unwrap();
        tree = insert(&tree, effort("c", EffortKind::Cooldown, TargetBasis::Time, 600)).unwrap();

        let ids: Vec<&str> = tree.iter().map(Segment::id).collect();
        assert_eq!(ids, vec!["w", "rep", "c"]);
        assert_eq!(totals(&tree).duration_s, 600 + 15 * (30 + 30) + 600);
    }
}
