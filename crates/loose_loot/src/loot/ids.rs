//! Item id generation and item-tree helpers.
use std::collections::{HashMap, HashSet};

use rand::RngCore;

use crate::error::{Error, Result};
use crate::loot::{Item, ItemId};

/// Generate a fresh 24-character lowercase hex item id from `rng`.
pub fn generate_id<R: RngCore>(rng: &mut R) -> ItemId {
    let hi = rng.next_u64();
    let lo = rng.next_u32();
    format!("{hi:016x}{lo:08x}")
}

/// Collect the item `root_id` and all of its descendants from `pool`.
///
/// The root comes first, followed by descendants in depth-first order, children in
/// pool order. Returns `None` if `root_id` is not in the pool.
pub fn collect_tree(pool: &[Item], root_id: &str) -> Option<Vec<Item>> {
    let root = pool.iter().find(|i| i.id == root_id)?;

    let mut children: HashMap<&str, Vec<&Item>> = HashMap::new();
    for item in pool {
        if let Some(parent) = item.parent_id.as_deref() {
            children.entry(parent).or_default().push(item);
        }
    }

    let mut out = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![root];
    while let Some(item) = stack.pop() {
        if !visited.insert(item.id.as_str()) {
            continue;
        }
        out.push(item.clone());
        if let Some(kids) = children.get(item.id.as_str()) {
            // Reverse so the first child is visited first.
            stack.extend(kids.iter().rev().copied());
        }
    }
    Some(out)
}

/// Give every item in `tree` a fresh id, remapping parent links to match.
///
/// Parent ids that point outside the tree are left untouched.
pub fn replace_ids<R: RngCore>(tree: Vec<Item>, rng: &mut R) -> Vec<Item> {
    let remap: HashMap<ItemId, ItemId> = tree
        .iter()
        .map(|i| (i.id.clone(), generate_id(rng)))
        .collect();

    tree.into_iter()
        .map(|mut item| {
            if let Some(new_id) = remap.get(&item.id) {
                item.id = new_id.clone();
            }
            if let Some(parent) = item.parent_id.as_mut() {
                if let Some(new_parent) = remap.get(parent.as_str()) {
                    *parent = new_parent.clone();
                }
            }
            item
        })
        .collect()
}

/// Check that `tree` is a single rooted tree: the first record is the only one
/// without an in-tree parent, ids are unique and every parent resolves.
pub fn validate_tree(tree: &[Item]) -> Result<()> {
    let Some(root) = tree.first() else {
        return Err(Error::MalformedItemTree("empty item tree".into()));
    };

    let mut ids: HashSet<&str> = HashSet::with_capacity(tree.len());
    for item in tree {
        if !ids.insert(item.id.as_str()) {
            return Err(Error::MalformedItemTree(format!(
                "duplicate item id '{}'",
                item.id
            )));
        }
    }

    for item in &tree[1..] {
        match item.parent_id.as_deref() {
            Some(parent) if ids.contains(parent) => {}
            Some(parent) => {
                return Err(Error::MalformedItemTree(format!(
                    "item '{}' references missing parent '{parent}'",
                    item.id
                )))
            }
            None => {
                return Err(Error::MalformedItemTree(format!(
                    "item '{}' has no parent but '{}' is the root",
                    item.id, root.id
                )))
            }
        }
    }

    if root.parent_id.as_deref().is_some_and(|p| ids.contains(p)) {
        return Err(Error::MalformedItemTree(format!(
            "root '{}' is parented inside its own tree",
            root.id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn weapon_pool() -> Vec<Item> {
        vec![
            Item::new("other", "tpl_other"),
            Item::new("gun", "tpl_gun"),
            Item::new("barrel", "tpl_barrel").with_parent("gun", "mod_barrel"),
            Item::new("muzzle", "tpl_muzzle").with_parent("barrel", "mod_muzzle"),
            Item::new("stock", "tpl_stock").with_parent("gun", "mod_stock"),
            Item::new("other_child", "tpl_x").with_parent("other", "main"),
        ]
    }

    #[test]
    fn generated_ids_are_hex_and_distinct() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = generate_id(&mut rng);
        let b = generate_id(&mut rng);
        assert_eq!(a.len(), 24);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn collect_tree_returns_root_first_with_descendants() {
        let tree = collect_tree(&weapon_pool(), "gun").unwrap();
        let ids: Vec<_> = tree.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["gun", "barrel", "muzzle", "stock"]);
    }

    #[test]
    fn collect_tree_missing_root_is_none() {
        assert!(collect_tree(&weapon_pool(), "nope").is_none());
    }

    #[test]
    fn replace_ids_preserves_structure() {
        let mut rng = StdRng::seed_from_u64(9);
        let tree = collect_tree(&weapon_pool(), "gun").unwrap();
        let replaced = replace_ids(tree.clone(), &mut rng);

        assert_eq!(replaced.len(), tree.len());
        for (old, new) in tree.iter().zip(&replaced) {
            assert_ne!(old.id, new.id);
            assert_eq!(old.tpl, new.tpl);
            assert_eq!(old.slot_id, new.slot_id);
        }
        assert_eq!(replaced[1].parent_id.as_ref(), Some(&replaced[0].id));
        assert_eq!(replaced[2].parent_id.as_ref(), Some(&replaced[1].id));
        assert_eq!(replaced[3].parent_id.as_ref(), Some(&replaced[0].id));
        validate_tree(&replaced).unwrap();
    }

    #[test]
    fn validate_tree_rejects_orphans_and_second_roots() {
        let orphan = vec![
            Item::new("a", "t"),
            Item::new("b", "t").with_parent("zzz", "slot"),
        ];
        assert!(matches!(
            validate_tree(&orphan),
            Err(Error::MalformedItemTree(_))
        ));

        let two_roots = vec![Item::new("a", "t"), Item::new("b", "t")];
        assert!(validate_tree(&two_roots).is_err());

        let dup = vec![Item::new("a", "t"), Item::new("a", "t").with_parent("a", "s")];
        assert!(validate_tree(&dup).is_err());

        assert!(validate_tree(&[]).is_err());
    }

    #[test]
    fn validate_tree_accepts_single_item() {
        validate_tree(&[Item::new("solo", "t")]).unwrap();
    }
}
