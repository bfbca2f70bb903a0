use std::collections::HashMap;
use std::ops::Range;

use crate::protocol::{Orientation, Role, Value};

type SectionData = HashMap<Role, Value>;

/// Header values per orientation and section
///
/// A missing section has never been requested.
#[derive(Debug, Default)]
pub struct HeaderCache {
    horizontal: HashMap<usize, SectionData>,
    vertical: HashMap<usize, SectionData>,
}

impl HeaderCache {
    fn sections(&self, orientation: Orientation) -> &HashMap<usize, SectionData> {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    fn sections_mut(&mut self, orientation: Orientation) -> &mut HashMap<usize, SectionData> {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }

    pub fn contains(&self, orientation: Orientation, section: usize) -> bool {
        self.sections(orientation).contains_key(&section)
    }

    pub fn value(&self, orientation: Orientation, section: usize, role: Role) -> Option<&Value> {
        self.sections(orientation).get(&section)?.get(&role)
    }

    /// Replace everything known about one section
    pub fn insert(&mut self, orientation: Orientation, section: usize, data: SectionData) {
        self.sections_mut(orientation).insert(section, data);
    }

    /// Forget every cached section inside `sections`
    pub fn remove_range(&mut self, orientation: Orientation, sections: Range<usize>) {
        self.sections_mut(orientation)
            .retain(|section, _| !sections.contains(section));
    }

    pub fn clear(&mut self) {
        self.horizontal.clear();
        self.vertical.clear();
    }
}
