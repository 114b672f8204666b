//! Pure, path-indexed edits of an item tree.
//!
//! Items are located by id, which yields an index path from the root. Every
//! edit returns a new `Vec<Item>`; the input is never mutated.

use super::item::Item;
use crate::error::{DomainError, DomainResult};

/// Index path from the root list to an item.
pub type ItemPath = Vec<usize>;

/// Returns the index path of the item with `id`, depth first.
#[must_use]
pub fn locate(items: &[Item], id: &str) -> Option<ItemPath> {
    for (index, item) in items.iter().enumerate() {
        if item.id() == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = locate(item.children(), id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Returns the item at `path`.
#[must_use]
pub fn get<'a>(items: &'a [Item], path: &[usize]) -> Option<&'a Item> {
    let (first, rest) = path.split_first()?;
    let item = items.get(*first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        get(item.children(), rest)
    }
}

/// Returns the item with `id`.
#[must_use]
pub fn find<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    locate(items, id).and_then(|path| get(items, &path))
}

/// Inserts `item` into the folder `parent` (or the root) at `index`,
/// appending when `index` is `None` or past the end.
///
/// # Errors
///
/// Fails when the parent does not exist or is a route, or when any id of the
/// new subtree is already present.
pub fn insert(
    items: &[Item],
    parent: Option<&str>,
    index: Option<usize>,
    item: Item,
) -> DomainResult<Vec<Item>> {
    let mut new_ids = Vec::new();
    item.collect_ids(&mut new_ids);
    if let Some(dup) = new_ids.iter().find(|id| locate(items, id).is_some()) {
        return Err(DomainError::InvalidCollectionItem(format!(
            "duplicate id {dup}"
        )));
    }

    let parent_path = resolve_parent(items, parent)?;
    let mut out = items.to_vec();
    let children = children_mut(&mut out, &parent_path)?;
    let at = index.map_or(children.len(), |i| i.min(children.len()));
    children.insert(at, item);
    Ok(out)
}

/// Removes the item with `id` and returns the new tree plus the removed item.
///
/// # Errors
///
/// Fails when no item has `id`.
pub fn remove(items: &[Item], id: &str) -> DomainResult<(Vec<Item>, Item)> {
    let path = locate(items, id).ok_or_else(|| DomainError::ItemNotFound(id.to_string()))?;
    let (last, parent_path) = path
        .split_last()
        .ok_or_else(|| DomainError::InvalidPosition(format!("{path:?}")))?;

    let mut out = items.to_vec();
    let children = children_mut(&mut out, parent_path)?;
    let removed = children.remove(*last);
    Ok((out, removed))
}

/// Moves the item with `id` under `new_parent` (or the root) at `index`.
///
/// # Errors
///
/// Fails when the item or the target folder does not exist, or when the
/// target is the item itself or one of its descendants.
pub fn move_item(
    items: &[Item],
    id: &str,
    new_parent: Option<&str>,
    index: Option<usize>,
) -> DomainResult<Vec<Item>> {
    let moving = find(items, id).ok_or_else(|| DomainError::ItemNotFound(id.to_string()))?;
    if let Some(target) = new_parent {
        if target == id || locate(moving.children(), target).is_some() {
            return Err(DomainError::InvalidCollectionItem(format!(
                "cannot move {id} into its own subtree"
            )));
        }
    }

    let (without, removed) = remove(items, id)?;
    insert(&without, new_parent, index, removed)
}

/// Moves the child at `from` to position `to` within `parent` (or the root).
///
/// # Errors
///
/// Fails when the parent does not exist or either index is out of range.
pub fn reorder(
    items: &[Item],
    parent: Option<&str>,
    from: usize,
    to: usize,
) -> DomainResult<Vec<Item>> {
    let parent_path = resolve_parent(items, parent)?;
    let mut out = items.to_vec();
    let children = children_mut(&mut out, &parent_path)?;
    let len = children.len();
    if from >= len || to >= len {
        return Err(DomainError::InvalidPosition(format!(
            "reorder {from} -> {to} in list of {len}"
        )));
    }
    let item = children.remove(from);
    children.insert(to, item);
    Ok(out)
}

fn resolve_parent(items: &[Item], parent: Option<&str>) -> DomainResult<ItemPath> {
    match parent {
        None => Ok(Vec::new()),
        Some(id) => {
            let path = locate(items, id).ok_or_else(|| DomainError::ItemNotFound(id.to_string()))?;
            match get(items, &path) {
                Some(Item::Folder(_)) => Ok(path),
                _ => Err(DomainError::InvalidCollectionItem(format!(
                    "{id} is not a folder"
                ))),
            }
        }
    }
}

fn children_mut<'a>(items: &'a mut Vec<Item>, folder_path: &[usize]) -> DomainResult<&'a mut Vec<Item>> {
    let mut current = items;
    for &index in folder_path {
        current = match current.get_mut(index) {
            Some(Item::Folder(folder)) => &mut folder.items,
            Some(Item::Route(route)) => {
                return Err(DomainError::InvalidCollectionItem(format!(
                    "route {} cannot hold items",
                    route.id
                )));
            }
            None => return Err(DomainError::InvalidPosition(format!("{folder_path:?}"))),
        };
    }
    Ok(current)
}
