//! Collection tree: folders, routes and pure editing operations.

mod item;
pub mod tree;

pub use item::{Collection, Folder, Item, Route};
