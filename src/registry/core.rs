use std::collections::HashSet;
use std::fmt;

use blake3::Hash;
use serde::{Deserialize, Serialize};

use crate::geometry::GridRect;
use crate::layout::LayoutItem;

/// Serialized rich-text markup stored for each section.
pub type SectionContent = String;

/// Opaque section identifier. Allocated from a monotonic counter and never
/// reused within a store, even after `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct SectionId(u64);

impl SectionId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section-{}", self.0)
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.to_string()
    }
}

/// Geometry assigned to newly created sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionDefaults {
    pub w: u16,
    pub h: u16,
    pub min_w: u16,
    pub min_h: u16,
}

impl Default for SectionDefaults {
    fn default() -> Self {
        Self {
            w: 6,
            h: 8,
            min_w: 1,
            min_h: 2,
        }
    }
}

/// One positioned, independently editable block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub content: SectionContent,
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
    pub min_w: u16,
    pub min_h: u16,
}

impl Section {
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    pub fn layout_item(&self) -> LayoutItem {
        LayoutItem {
            id: self.id,
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
            min_w: self.min_w,
            min_h: self.min_h,
        }
    }
}

#[derive(Debug, Clone)]
struct SectionEntry {
    section: Section,
    hash: Hash,
}

/// Ordered store of sections. Append order is display order.
#[derive(Debug)]
pub struct SectionStore {
    entries: Vec<SectionEntry>,
    next_id: u64,
    defaults: SectionDefaults,
    dirty: HashSet<SectionId>,
}

impl Default for SectionStore {
    fn default() -> Self {
        Self::new(SectionDefaults::default())
    }
}

impl SectionStore {
    pub fn new(defaults: SectionDefaults) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            defaults,
            dirty: HashSet::new(),
        }
    }

    /// Append a new empty section. Names that are empty or whitespace-only
    /// are refused and return `None`.
    pub fn add(&mut self, name: &str) -> Option<SectionId> {
        if name.trim().is_empty() {
            return None;
        }

        let id = SectionId(self.next_id);
        self.next_id += 1;

        let content = SectionContent::new();
        let SectionDefaults { w, h, min_w, min_h } = self.defaults;
        self.entries.push(SectionEntry {
            hash: blake3::hash(content.as_bytes()),
            section: Section {
                id,
                name: name.to_string(),
                content,
                x: 0,
                y: 0,
                w: w.max(min_w),
                h: h.max(min_h),
                min_w,
                min_h,
            },
        });
        self.dirty.insert(id);
        Some(id)
    }

    /// Delete a section. Returns `false` when the id is not present.
    pub fn remove(&mut self, id: SectionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.section.id != id);
        self.dirty.remove(&id);
        self.entries.len() != before
    }

    /// Replace the content of a section. Returns `true` only when the stored
    /// content actually changed.
    pub fn update_content(&mut self, id: SectionId, content: SectionContent) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };

        let new_hash = blake3::hash(content.as_bytes());
        if entry.hash == new_hash {
            return false;
        }
        entry.section.content = content;
        entry.hash = new_hash;
        self.dirty.insert(id);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dirty.clear();
    }

    /// Read-only snapshot in display order.
    pub fn list(&self) -> Vec<Section> {
        self.entries.iter().map(|entry| entry.section.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.entries.iter().map(|entry| &entry.section)
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.entries
            .iter()
            .find(|entry| entry.section.id == id)
            .map(|entry| &entry.section)
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<SectionId> {
        self.iter().map(|section| section.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn defaults(&self) -> SectionDefaults {
        self.defaults
    }

    /// Write geometry for one section. Only the synchronizer calls this.
    pub(crate) fn apply_geometry(&mut self, item: &LayoutItem) -> bool {
        let Some(entry) = self.entry_mut(item.id) else {
            return false;
        };

        let section = &mut entry.section;
        let changed = section.x != item.x
            || section.y != item.y
            || section.w != item.w
            || section.h != item.h
            || section.min_w != item.min_w
            || section.min_h != item.min_h;
        if changed {
            section.x = item.x;
            section.y = item.y;
            section.w = item.w;
            section.h = item.h;
            section.min_w = item.min_w;
            section.min_h = item.min_h;
            self.dirty.insert(item.id);
        }
        changed
    }

    /// Drain sections that changed since the last call, in display order.
    pub fn take_dirty(&mut self) -> Vec<Section> {
        if self.dirty.is_empty() {
            return Vec::new();
        }
        let dirty = std::mem::take(&mut self.dirty);
        self.iter()
            .filter(|section| dirty.contains(&section.id))
            .cloned()
            .collect()
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    fn entry_mut(&mut self, id: SectionId) -> Option<&mut SectionEntry> {
        self.entries.iter_mut().find(|entry| entry.section.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_uses_defaults_and_appends() {
        let mut store = SectionStore::default();
        let intro = store.add("Intro").unwrap();
        let body = store.add("Body").unwrap();

        let sections = store.list();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, intro);
        assert_eq!(sections[1].id, body);
        assert_eq!(sections[0].rect(), GridRect::new(0, 0, 6, 8));
        assert_eq!((sections[0].min_w, sections[0].min_h), (1, 2));
        assert!(sections[0].content.is_empty());
    }

    #[test]
    fn blank_names_are_refused() {
        let mut store = SectionStore::default();
        assert!(store.add("").is_none());
        assert!(store.add("   \t").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = SectionStore::default();
        let id = store.add("Intro").unwrap();
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = SectionStore::default();
        let first = store.add("a").unwrap();
        store.clear();
        let second = store.add("b").unwrap();
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn update_content_detects_changes() {
        let mut store = SectionStore::default();
        let id = store.add("Intro").unwrap();
        store.take_dirty();

        assert!(store.update_content(id, "<p>hello</p>".to_string()));
        assert_eq!(store.take_dirty().len(), 1);

        assert!(!store.update_content(id, "<p>hello</p>".to_string()));
        assert!(store.take_dirty().is_empty());
        assert_eq!(store.get(id).unwrap().content, "<p>hello</p>");
    }

    #[test]
    fn update_content_on_missing_id_is_noop() {
        let mut store = SectionStore::default();
        let id = store.add("Intro").unwrap();
        store.remove(id);
        assert!(!store.update_content(id, "x".to_string()));
    }

    #[test]
    fn apply_geometry_marks_dirty_only_on_change() {
        let mut store = SectionStore::default();
        let id = store.add("Intro").unwrap();
        store.take_dirty();

        let mut item = store.get(id).unwrap().layout_item();
        assert!(!store.apply_geometry(&item));
        item.y = 3;
        assert!(store.apply_geometry(&item));
        assert_eq!(store.get(id).unwrap().y, 3);
        assert_eq!(store.take_dirty().len(), 1);
    }

    #[test]
    fn section_id_serializes_as_string() {
        let mut store = SectionStore::default();
        let id = store.add("Intro").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"section-1\"");
    }
}
