//! Descriptors for the concrete Semaphore component kinds.

use crate::descriptor::{Collection, Nested, PathParam};

/// Inventory of a project: `/project/{project_id}/inventory`.
///
/// Body attributes are `name`, `type` (`static` or `file`) and `inventory`
/// (inline content or a path to an inventory file).
pub fn inventory() -> Nested<Collection> {
    project_component(
        Collection::new("inventory", "/inventory").attributes(["type", "inventory"]),
    )
}

/// Scope any collection under `/project/{project_id}`.
pub fn project_component(collection: Collection) -> Nested<Collection> {
    Nested::new(collection, PathParam::project())
}
