//! Collection item types

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::request::RequestSpec;
use crate::response::ResponseSpec;

/// A folder containing routes and other folders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier within the collection.
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Children in display order.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Folder {
    /// Creates a new empty folder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Adds a child and returns the folder, for building trees inline.
    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }
}

/// A request stored in a collection, with an optional saved response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier within the collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The request.
    pub request: RequestSpec,
    /// Example response kept alongside the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

impl Route {
    /// Creates a route with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            request,
            response: None,
        }
    }
}

/// A node of the collection tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// A folder containing other items
    Folder(Folder),
    /// A request
    Route(Route),
}

impl Item {
    /// Returns the ID of this item.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(f) => &f.id,
            Self::Route(r) => &r.id,
        }
    }

    /// Returns the name of this item.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::Route(r) => &r.name,
        }
    }

    /// Returns the children of a folder; routes have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Folder(f) => &f.items,
            Self::Route(_) => &[],
        }
    }

    /// Visits the ids of this item and all of its descendants.
    pub fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.id());
        for child in self.children() {
            child.collect_ids(out);
        }
    }
}

/// A named tree of folders and routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub id: String,
    /// Collection name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Top-level items
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Collection {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            description: None,
            items: Vec::new(),
        }
    }

    /// Returns the total number of routes in the collection (recursive).
    #[must_use]
    pub fn route_count(&self) -> usize {
        fn count_in_items(items: &[Item]) -> usize {
            items.iter().fold(0, |acc, item| {
                acc + match item {
                    Item::Route(_) => 1,
                    Item::Folder(f) => count_in_items(&f.items),
                }
            })
        }
        count_in_items(&self.items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_route_count_is_recursive() {
        let mut collection = Collection::new("Test");
        collection
            .items
            .push(Item::Route(Route::new("Ping", RequestSpec::get("https://x/ping"))));
        let folder = Folder::new("Users")
            .with_item(Item::Route(Route::new("List", RequestSpec::get("https://x/users"))))
            .with_item(Item::Folder(
                Folder::new("Admin")
                    .with_item(Item::Route(Route::new("Ban", RequestSpec::post("https://x/ban")))),
            ));
        collection.items.push(Item::Folder(folder));

        assert_eq!(collection.route_count(), 3);
    }

    #[test]
    fn test_item_tagged_serialization() {
        let item = Item::Folder(Folder::new("Empty"));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "folder");
        assert_eq!(value["name"], "Empty");
    }
}
