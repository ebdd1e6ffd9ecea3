//! Domain Layer - Core Entity Trait
//!
//! Every board entity has an identifier that is stable across the
//! optimistic temp-id swap.

/// Core trait for all domain entities
pub trait Entity: Sized + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Remove the entity with `id`, returning it.
pub fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: T::Id) -> Option<T> {
    let idx = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(idx))
}

/// Put the server's copy of a new entity where its temporary stand-in was.
///
/// A refetch may have replaced the list while the create was in flight: the
/// stand-in is then gone and `created` is appended, unless the refetch
/// already brought it along. Either way the list ends with exactly one
/// entry for `created`.
pub fn swap_temporary<T: Entity>(items: &mut Vec<T>, temp: T::Id, created: T) {
    let id = created.id();
    if items.iter().any(|item| item.id() == id) {
        remove_by_id(items, temp);
        return;
    }
    match items.iter_mut().find(|item| item.id() == temp) {
        Some(slot) => *slot = created,
        None => items.push(created),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Tag, TagId};

    fn ids(tags: &[Tag]) -> Vec<TagId> {
        tags.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_swap_replaces_stand_in_in_place() {
        let mut tags = vec![Tag::new(TagId(-1), "novo"), Tag::new(TagId(2), "Foco")];
        swap_temporary(&mut tags, TagId(-1), Tag::new(TagId(7), "novo"));
        assert_eq!(ids(&tags), vec![TagId(7), TagId(2)]);
    }

    #[test]
    fn test_swap_appends_when_stand_in_was_dropped() {
        let mut tags = vec![Tag::new(TagId(2), "Foco")];
        swap_temporary(&mut tags, TagId(-1), Tag::new(TagId(7), "novo"));
        assert_eq!(ids(&tags), vec![TagId(2), TagId(7)]);
    }

    #[test]
    fn test_swap_never_duplicates_a_refetched_entity() {
        let mut tags = vec![
            Tag::new(TagId(-1), "novo"),
            Tag::new(TagId(7), "novo"),
        ];
        swap_temporary(&mut tags, TagId(-1), Tag::new(TagId(7), "novo"));
        assert_eq!(ids(&tags), vec![TagId(7)]);

        let mut tags = vec![Tag::new(TagId(7), "novo")];
        swap_temporary(&mut tags, TagId(-1), Tag::new(TagId(7), "novo"));
        assert_eq!(ids(&tags), vec![TagId(7)]);
    }
}
