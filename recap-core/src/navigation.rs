use crate::markup::PageMarkup;
use crate::types::NavigationSnapshot;
use serde::{Deserialize, Serialize};

/// The page's session history: one state per entry, a cursor on the current one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: Vec<NavigationSnapshot>,
    index: usize,
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::with_state(NavigationSnapshot::default())
    }

    /// History whose current entry already carries a state (e.g. after a reload)
    pub fn with_state(state: NavigationSnapshot) -> Self {
        Self {
            entries: vec![state],
            index: 0,
        }
    }

    pub fn current_state(&self) -> &NavigationSnapshot {
        &self.entries[self.index]
    }

    pub fn replace_state(&mut self, state: NavigationSnapshot) {
        self.entries[self.index] = state;
    }

    /// Add an entry after the current one, dropping any forward entries
    pub fn push_state(&mut self, state: NavigationSnapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        self.index += 1;
    }

    /// Move back one entry; returns the state landed on
    pub fn back(&mut self) -> Option<&NavigationSnapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    pub fn forward(&mut self) -> Option<&NavigationSnapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn entries_between(
        &mut self,
        first: usize,
        last: usize,
    ) -> impl Iterator<Item = &mut NavigationSnapshot> {
        self.entries.iter_mut().skip(first).take((last + 1).saturating_sub(first))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureState {
    NotCaptured,
    Captured,
}

/// Sole writer of the page's history. Tracks whether the page was captured
/// and whether its upload already happened.
#[derive(Debug, Clone)]
pub struct NavigationStateManager {
    history: NavigationHistory,
    state: CaptureState,
    /// Entry the page loaded into; entries before it belong to earlier pages
    first_entry: usize,
    /// Last entry this manager pushed
    last_entry: usize,
}

impl Default for NavigationStateManager {
    fn default() -> Self {
        Self::new(NavigationHistory::new())
    }
}

impl NavigationStateManager {
    pub fn new(history: NavigationHistory) -> Self {
        let current = history.index();
        Self {
            history,
            state: CaptureState::NotCaptured,
            first_entry: current,
            last_entry: current,
        }
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn capture_state(&self) -> CaptureState {
        self.state
    }

    pub fn is_uploaded(&self) -> bool {
        self.history.current_state().uploaded
    }

    /// Record that this page's upload happened. The page's own entries (the
    /// one it loaded into and any display entries pushed since) are marked so
    /// that neither the original view nor the displayed document repeats it.
    pub fn mark_uploaded(&mut self) {
        for entry in self.history.entries_between(self.first_entry, self.last_entry) {
            entry.uploaded = true;
        }
    }

    /// Remember the markup that was showing before the capture replaced it
    pub fn enter_captured(&mut self, previous: String) {
        let uploaded = self.is_uploaded();
        self.history.replace_state(NavigationSnapshot {
            content: Some(previous),
            uploaded,
        });
        self.state = CaptureState::Captured;
    }

    /// New history entry for the document now on display
    pub fn push_display(&mut self, content: String) {
        let uploaded = self.is_uploaded();
        self.history.push_state(NavigationSnapshot {
            content: Some(content),
            uploaded,
        });
        self.last_entry = self.history.index();
    }

    /// Back button. Once captured, the entry's stored markup is put back on the page.
    pub fn go_back(&mut self, page: &mut PageMarkup) -> bool {
        let restore = self.state == CaptureState::Captured;
        match self.history.back() {
            Some(state) => {
                if let (true, Some(content)) = (restore, state.content.clone()) {
                    page.replace(content);
                }
                true
            }
            None => false,
        }
    }

    pub fn go_forward(&mut self, page: &mut PageMarkup) -> bool {
        let restore = self.state == CaptureState::Captured;
        match self.history.forward() {
            Some(state) => {
                if let (true, Some(content)) = (restore, state.content.clone()) {
                    page.replace(content);
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_restores_exact_prior_content() {
        let mut page = PageMarkup::new("<html><body>receipt</body></html>");
        let mut navigation = NavigationStateManager::default();

        let previous = page.html().to_string();
        navigation.enter_captured(previous.clone());
        page.replace("<html><body>document</body></html>".to_string());
        navigation.push_display(page.html().to_string());

        assert!(navigation.go_back(&mut page));
        assert_eq!(page.html(), previous);
        assert!(navigation.go_forward(&mut page));
        assert_eq!(page.html(), "<html><body>document</body></html>");
    }

    #[test]
    fn back_without_capture_leaves_page_alone() {
        let mut history = NavigationHistory::new();
        history.push_state(NavigationSnapshot::with_content("other".to_string()));
        let mut navigation = NavigationStateManager::new(history);
        let mut page = PageMarkup::new("current");

        assert!(navigation.go_back(&mut page));
        assert_eq!(page.html(), "current");
        assert!(!navigation.go_back(&mut page));
    }

    #[test]
    fn uploaded_marker_spans_the_page_entries() {
        let mut navigation = NavigationStateManager::default();
        navigation.enter_captured("before".to_string());
        navigation.push_display("after".to_string());
        navigation.mark_uploaded();

        assert!(navigation.is_uploaded());
        let mut page = PageMarkup::new("after");
        navigation.go_back(&mut page);
        assert!(navigation.is_uploaded());
        assert_eq!(page.html(), "before");
    }

    #[test]
    fn uploaded_marker_leaves_earlier_pages_alone() {
        let mut history = NavigationHistory::new();
        history.push_state(NavigationSnapshot::with_content("receipt".to_string()));
        let mut navigation = NavigationStateManager::new(history);

        navigation.enter_captured("receipt".to_string());
        navigation.push_display("document".to_string());
        navigation.mark_uploaded();

        let mut page = PageMarkup::new("document");
        assert!(navigation.go_back(&mut page));
        assert!(navigation.is_uploaded());
        assert!(navigation.go_back(&mut page));
        assert!(!navigation.is_uploaded());
        assert_eq!(navigation.history().len(), 3);
    }

    #[test]
    fn push_drops_forward_entries() {
        let mut history = NavigationHistory::new();
        history.push_state(NavigationSnapshot::default());
        history.push_state(NavigationSnapshot::default());
        history.back();
        history.push_state(NavigationSnapshot::uploaded());
        assert_eq!(history.len(), 3);
        assert!(history.forward().is_none());
        assert!(history.current_state().uploaded);
    }
}
