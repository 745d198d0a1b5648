//! Insertion-ordered map keyed by component tag.

/// Open-ended per-component records (wings, fuselages, drag contributions).
///
/// Iteration follows insertion order; inserting an existing tag replaces the
/// value in place.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for ComponentMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> ComponentMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous value for `tag`, if any.
    pub fn insert(&mut self, tag: impl Into<String>, value: T) -> Option<T> {
        let tag = tag.into();
        if let Some(slot) = self.entries.iter_mut().find(|(t, _)| *t == tag) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((tag, value));
        None
    }

    pub fn get(&self, tag: &str) -> Option<&T> {
        self.entries.iter().find(|(t, _)| t == tag).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T, S: Into<String>> FromIterator<(S, T)> for ComponentMap<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (tag, value) in iter {
            map.insert(tag, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order_and_replaces_in_place() {
        let mut map = ComponentMap::new();
        map.insert("main_wing", 1);
        map.insert("horizontal_stabilizer", 2);
        map.insert("vertical_stabilizer", 3);
        assert_eq!(map.insert("horizontal_stabilizer", 20), Some(2));

        let tags: Vec<_> = map.tags().collect();
        assert_eq!(
            tags,
            ["main_wing", "horizontal_stabilizer", "vertical_stabilizer"]
        );
        assert_eq!(map.get("horizontal_stabilizer"), Some(&20));
        assert!(map.get("canard").is_none());
    }
}
