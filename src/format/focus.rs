use crate::registry::SectionId;

/// Tracks which section is the target of toolbar formatting.
///
/// Blur does not release focus: clicking a toolbar button blurs the editable
/// region before the command is applied, and the command must still reach
/// that region. Focus is released only when the section goes away.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FocusTracker {
    active: Option<SectionId>,
    previous: Option<SectionId>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&mut self, id: SectionId) {
        if self.active != Some(id) {
            self.previous = self.active.replace(id);
        }
    }

    /// Release focus if `id` holds it.
    pub fn release(&mut self, id: SectionId) {
        if self.active == Some(id) {
            self.previous = self.active.take();
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.previous = None;
    }

    pub fn current(&self) -> Option<SectionId> {
        self.active
    }

    pub fn previous(&self) -> Option<SectionId> {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SectionStore;

    fn two_ids() -> (SectionId, SectionId) {
        let mut store = SectionStore::default();
        (store.add("a").unwrap(), store.add("b").unwrap())
    }

    #[test]
    fn focus_and_switch() {
        let (a, b) = two_ids();
        let mut focus = FocusTracker::new();
        focus.focus(a);
        focus.focus(b);
        assert_eq!(focus.current(), Some(b));
        assert_eq!(focus.previous(), Some(a));
    }

    #[test]
    fn release_by_holder() {
        let (a, _) = two_ids();
        let mut focus = FocusTracker::new();
        focus.focus(a);
        focus.release(a);
        assert!(focus.current().is_none());
    }

    #[test]
    fn release_other_noop() {
        let (a, b) = two_ids();
        let mut focus = FocusTracker::new();
        focus.focus(a);
        focus.release(b);
        assert_eq!(focus.current(), Some(a));
    }

    #[test]
    fn reset_clears_everything() {
        let (a, b) = two_ids();
        let mut focus = FocusTracker::new();
        focus.focus(a);
        focus.focus(b);
        focus.reset();
        assert_eq!(focus, FocusTracker::default());
    }
}
