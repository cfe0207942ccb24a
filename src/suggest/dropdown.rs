//! Selectable dropdown list state.

use crate::domain::Suggestion;

/// Items currently offered plus the keyboard/pointer highlight.
///
/// `active_index` is `None` when nothing is highlighted. The dropdown is open
/// exactly when it has items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dropdown {
    items: Vec<Suggestion>,
    active_index: Option<usize>,
}

impl Dropdown {
    /// Replaces the items and clears the highlight. An empty list closes the
    /// dropdown.
    pub fn populate(&mut self, items: Vec<Suggestion>) {
        self.items = items;
        self.active_index = None;
    }

    /// Clears items and highlight.
    pub fn close(&mut self) {
        self.items.clear();
        self.active_index = None;
    }

    /// Whether the dropdown is showing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.items.is_empty()
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    /// Highlighted index, if any.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Highlighted item, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Suggestion> {
        self.active_index.and_then(|i| self.items.get(i))
    }

    /// Moves the highlight down, stopping at the last item.
    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.active_index = Some(self.active_index.map_or(0, |i| (i + 1).min(last)));
    }

    /// Moves the highlight up; moving up from the first item clears it.
    pub fn move_up(&mut self) {
        self.active_index = match self.active_index {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Highlights the item under the pointer. Out-of-range indices are ignored.
    pub fn hover(&mut self, index: usize) {
        if index < self.items.len() {
            self.active_index = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Dropdown {
        let mut d = Dropdown::default();
        d.populate(vec![
            Suggestion::query("a"),
            Suggestion::query("b"),
            Suggestion::query("c"),
        ]);
        d
    }

    #[test]
    fn arrow_navigation_is_clamped() {
        let mut d = three();
        assert_eq!(d.active_index(), None);
        d.move_up();
        assert_eq!(d.active_index(), None);
        for _ in 0..5 {
            d.move_down();
        }
        assert_eq!(d.active_index(), Some(2));
        d.move_up();
        d.move_up();
        d.move_up();
        assert_eq!(d.active_index(), None);
    }

    #[test]
    fn open_iff_items_present() {
        let mut d = three();
        assert!(d.is_open());
        d.hover(1);
        assert_eq!(d.active(), Some(&Suggestion::query("b")));
        d.hover(9);
        assert_eq!(d.active_index(), Some(1));

        d.populate(Vec::new());
        assert!(!d.is_open());
        assert_eq!(d.active_index(), None);
        d.move_down();
        assert_eq!(d.active_index(), None);
    }
}
