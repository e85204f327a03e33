use keytree::{AddOutcome, Node, TraversalOrder, Tree};
use pretty_assertions::assert_eq;

/// 1 -> (2 -> 3), 4
fn sample() -> Tree<u32, String> {
    let mut tree = Tree::new();
    tree.add(1, 0, String::new());
    tree.add(2, 1, String::new());
    tree.add(3, 2, String::new());
    tree.add(4, 1, String::new());
    tree
}

fn ids<K: Copy, T>(nodes: &[&Node<K, T>]) -> Vec<K> {
    nodes.iter().map(|node| *node.id()).collect()
}

#[test]
fn test_root() {
    let empty: Tree<u32, i32> = Tree::new();
    assert!(empty.root().is_none());
    assert!(empty.is_empty());

    let tree = sample();
    assert_eq!(tree.root().map(|root| *root.id()), Some(1));
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_find() {
    let tree = sample();

    // Primary does not exist
    assert!(tree.find(&5).is_none());
    // Branch end
    assert_eq!(tree.find(&3).map(|node| *node.id()), Some(3));
    // Mid tree
    assert_eq!(tree.find(&2).map(|node| *node.id()), Some(2));
    // Root
    assert_eq!(tree.find(&1).map(|node| *node.id()), Some(1));
    assert!(tree.contains(&4));
}

#[test]
fn test_find_parents() {
    let tree = sample();

    assert!(tree.find_parents(&5).is_none());
    assert_eq!(ids(&tree.find_parents(&3).unwrap()), vec![2, 1]);
    assert_eq!(ids(&tree.find_parents(&2).unwrap()), vec![1]);
    assert_eq!(ids(&tree.find_parents(&1).unwrap()), Vec::<u32>::new());
}

#[test]
fn test_find_parents_after_re_root() {
    let mut tree: Tree<u32, ()> = Tree::new();
    tree.add(3, 2, ());
    tree.add(2, 1, ());
    tree.add(1, 0, ());

    assert_eq!(ids(&tree.find_parents(&3).unwrap()), vec![2, 1]);
    assert_eq!(tree.root().map(|root| *root.id()), Some(1));
}

#[test]
fn test_duplicate_add_leaves_tree_unchanged() {
    let mut tree = sample();
    tree.set_data(&2, "original".to_string());

    let outcome = tree.add(2, 4, "replacement".to_string());
    assert_eq!(outcome, AddOutcome::Existed);
    assert_eq!(outcome.as_flags(), (false, true));

    assert_eq!(tree.find(&2).unwrap().data(), "original");
    assert_eq!(tree.parent(&2).map(|node| *node.id()), Some(1));
    assert_eq!(tree.ids(TraversalOrder::BreadthFirst), vec![1, 2, 4, 3]);
}

#[test]
fn test_missing_parent_leaves_tree_unchanged() {
    let mut tree = sample();

    let outcome = tree.add(7, 6, String::new());
    assert_eq!(outcome.as_flags(), (false, false));
    assert_eq!(tree.len(), 4);
    assert!(tree.find(&7).is_none());

    // Retry once the parent exists
    assert!(tree.add(6, 4, String::new()).added());
    assert!(tree.add(7, 6, String::new()).added());
    assert_eq!(ids(&tree.find_parents(&7).unwrap()), vec![6, 4, 1]);
}

#[test]
fn test_re_root_correctness() {
    let mut tree: Tree<u32, &str> = Tree::new();
    tree.add(10, 20, "old root");
    tree.add(11, 10, "child");

    assert_eq!(tree.add(20, 30, "new root"), AddOutcome::Added);

    let root = tree.root().unwrap();
    assert_eq!(*root.id(), 20);
    assert_eq!(*root.parent_id(), 30);
    let children: Vec<_> = tree.children(&20).unwrap().map(|node| *node.id()).collect();
    assert_eq!(children, vec![10]);

    // The new root may itself be awaiting a parent
    assert_eq!(tree.add(30, 0, "newer root"), AddOutcome::Added);
    assert_eq!(tree.ids(TraversalOrder::DepthFirst), vec![30, 20, 10, 11]);
}

#[test]
fn test_re_root_two_cycle_rejected() {
    let mut tree: Tree<u32, ()> = Tree::new();
    tree.add(1, 2, ());

    assert_eq!(tree.add(2, 1, ()), AddOutcome::Cycle);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root().map(|root| *root.id()), Some(1));
}

#[test]
fn test_traversal_order_stability() {
    let tree = sample();

    for _ in 0..3 {
        assert_eq!(tree.ids(TraversalOrder::BreadthFirst), vec![1, 2, 4, 3]);
        assert_eq!(tree.ids(TraversalOrder::DepthFirst), vec![1, 2, 3, 4]);
    }
}

#[test]
fn test_string_keys() {
    let mut tree: Tree<String, u8> = Tree::new();
    tree.add("usr".to_string(), String::new(), 0);
    tree.add("bin".to_string(), "usr".to_string(), 1);
    tree.add("lib".to_string(), "usr".to_string(), 2);

    assert_eq!(
        tree.ids(TraversalOrder::DepthFirst),
        vec!["usr".to_string(), "bin".to_string(), "lib".to_string()]
    );
    assert_eq!(tree.parent(&"lib".to_string()).map(|node| node.id().as_str()), Some("usr"));
}

#[test]
fn test_index_tracks_every_node() {
    let tree = sample();
    let index = tree.index();
    assert_eq!(index.len(), tree.len());
    for node in tree.traverse(TraversalOrder::BreadthFirst) {
        let handle = index.find(node.id()).unwrap();
        assert_eq!(tree.get(handle).map(|found| *found.id()), Some(*node.id()));
    }
}
