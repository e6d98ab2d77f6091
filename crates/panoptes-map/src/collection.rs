use crate::submap::{Submap, SubmapConfig, SubmapId};

use log::warn;
use panoptes_core::SmallKeyHashMap;

/// Owns every live [`Submap`], indexed by id for O(1) access.
///
/// Not internally synchronized: concurrent mutation or index dereference
/// requires external mutual exclusion. Borrows returned by
/// [`Self::create_submap`] and [`Self::get_submap`] end at the next removal or
/// clear; the borrow checker enforces this.
///
/// Invariant: for every live id, `submaps[id_to_index[id]].id() == id`, and
/// the index maps exactly onto the set of live storage positions.
#[derive(Default)]
pub struct SubmapCollection {
    submaps: Vec<Submap>,
    id_to_index: SmallKeyHashMap<SubmapId, usize>,
}

impl SubmapCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `submap` and indexes it by its id.
    ///
    /// Ids are not validated here: adding a duplicate overwrites the index
    /// entry and leaves the older submap unreachable by id. Validate at the
    /// boundary when ids come from outside.
    pub fn add_submap(&mut self, submap: Submap) {
        let id = submap.id();
        if self.id_to_index.insert(id, self.submaps.len()).is_some() {
            warn!("submap id {id:?} added twice; the older entry is no longer indexed");
        }
        self.submaps.push(submap);
    }

    /// Constructs a submap with a fresh id, owned by this collection. The
    /// returned borrow is valid until that submap is removed or the collection
    /// is cleared.
    pub fn create_submap(&mut self, config: SubmapConfig) -> &mut Submap {
        let submap = Submap::new(config);
        self.id_to_index.insert(submap.id(), self.submaps.len());
        self.submaps.push(submap);
        let last = self.submaps.len() - 1;
        &mut self.submaps[last]
    }

    /// Removes the submap with `id`, returning false if it is unknown.
    ///
    /// Removal compacts the backing storage, so every recorded index greater
    /// than the removed position shifts down by one. O(submap count).
    pub fn remove_submap(&mut self, id: SubmapId) -> bool {
        let Some(removed_index) = self.id_to_index.remove(&id) else {
            return false;
        };
        self.submaps.remove(removed_index);
        for index in self.id_to_index.values_mut() {
            if *index > removed_index {
                *index -= 1;
            }
        }
        true
    }

    pub fn submap_id_exists(&self, id: SubmapId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    pub fn get_submap(&self, id: SubmapId) -> Option<&Submap> {
        let &index = self.id_to_index.get(&id)?;
        Some(&self.submaps[index])
    }

    pub fn get_submap_mut(&mut self, id: SubmapId) -> Option<&mut Submap> {
        let &index = self.id_to_index.get(&id)?;
        Some(&mut self.submaps[index])
    }

    /// Drops all owned submaps and empties the index.
    pub fn clear(&mut self) {
        self.submaps.clear();
        self.id_to_index.clear();
    }

    pub fn len(&self) -> usize {
        self.submaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submaps.is_empty()
    }

    /// Iterates submaps in storage order, which may change on removal.
    pub fn iter(&self) -> std::slice::Iter<'_, Submap> {
        self.submaps.iter()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
