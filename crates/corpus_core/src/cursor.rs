//! Keyset navigation over the title-ordered corpus.
//!
//! The pager never knows the corpus size. It asks for one item more than it
//! shows; the surplus item tells it whether another page exists in the
//! direction it travelled.

use std::collections::BTreeSet;

use corpus_logging::{corpus_debug, corpus_warn};

use crate::{Article, RequestSeq};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Window {
    pub items: Vec<Article>,
    pub size: usize,
    pub overflowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorState {
    pub anchor_key: Option<String>,
    pub direction: Direction,
    pub next_key: Option<String>,
}

/// Request for the cursor endpoint. `count` already includes the lookahead
/// item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: RequestSeq,
    pub start_title: Option<String>,
    pub count: usize,
    pub forward: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLoad {
    seq: RequestSeq,
    anchor: Option<String>,
    count: usize,
    direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPager {
    count: usize,
    window: Window,
    cursor: CursorState,
    at_start: bool,
    expanded: BTreeSet<String>,
    last_seq: RequestSeq,
    pending: Option<PendingLoad>,
    error: Option<String>,
}

impl Default for CursorPager {
    fn default() -> Self {
        Self::new(10)
    }
}

impl CursorPager {
    pub fn new(count: usize) -> Self {
        let count = count.max(1);
        Self {
            count,
            window: Window {
                size: count,
                ..Window::default()
            },
            cursor: CursorState::default(),
            at_start: true,
            expanded: BTreeSet::new(),
            last_seq: 0,
            pending: None,
            error: None,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_advance(&self) -> bool {
        self.cursor.next_key.is_some()
    }

    pub fn can_retreat(&self) -> bool {
        !self.at_start && self.cursor.anchor_key.is_some()
    }

    /// Issues a fetch of `count` items from `anchor`. The returned request
    /// supersedes every request issued before it.
    pub fn load_from(
        &mut self,
        anchor: Option<String>,
        count: usize,
        direction: Direction,
    ) -> PageRequest {
        let count = count.max(1);
        self.count = count;
        self.last_seq += 1;
        let seq = self.last_seq;
        corpus_debug!(
            "cursor load seq={} anchor={:?} count={} direction={:?}",
            seq,
            anchor,
            count,
            direction
        );
        self.pending = Some(PendingLoad {
            seq,
            anchor: anchor.clone(),
            count,
            direction,
        });
        PageRequest {
            seq,
            start_title: anchor,
            count: count.saturating_add(1),
            forward: direction == Direction::Forward,
        }
    }

    /// Reloads the window at its current anchor.
    pub fn reload(&mut self) -> PageRequest {
        self.load_from(self.cursor.anchor_key.clone(), self.count, Direction::Forward)
    }

    pub fn advance(&mut self) -> Option<PageRequest> {
        let next = self.cursor.next_key.clone()?;
        Some(self.load_from(Some(next), self.count, Direction::Forward))
    }

    pub fn retreat(&mut self) -> Option<PageRequest> {
        if !self.can_retreat() {
            return None;
        }
        let anchor = self.cursor.anchor_key.clone();
        Some(self.load_from(anchor, self.count, Direction::Backward))
    }

    pub fn set_count(&mut self, count: usize) -> PageRequest {
        self.load_from(self.cursor.anchor_key.clone(), count, Direction::Forward)
    }

    pub fn set_anchor(&mut self, title: impl Into<String>) -> PageRequest {
        let title = title.into();
        let anchor = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self.load_from(anchor, self.count, Direction::Forward)
    }

    /// Applies a reply. Returns `false` when the reply belongs to a request
    /// that has since been superseded.
    pub fn apply(&mut self, seq: RequestSeq, result: Result<Vec<Article>, String>) -> bool {
        let pending = match self.pending.take() {
            Some(pending) if pending.seq == seq => pending,
            other => {
                corpus_debug!("dropping stale cursor reply seq={} (latest {})", seq, self.last_seq);
                self.pending = other;
                return false;
            }
        };

        let raw = match result {
            Ok(raw) => raw,
            Err(message) => {
                corpus_warn!("cursor page fetch failed: {}", message);
                self.replace(
                    Window {
                        items: Vec::new(),
                        size: pending.count,
                        overflowed: false,
                    },
                    CursorState {
                        anchor_key: None,
                        direction: pending.direction,
                        next_key: None,
                    },
                );
                self.at_start = true;
                self.error = Some(message);
                return true;
            }
        };
        self.error = None;

        if pending.direction == Direction::Backward && raw.is_empty() {
            // Nothing precedes the window; keep showing it.
            self.at_start = true;
            return true;
        }

        let (window, cursor) =
            reduce_page(raw, pending.anchor.as_deref(), pending.count, pending.direction);
        self.at_start = match pending.direction {
            Direction::Forward => pending.anchor.is_none(),
            Direction::Backward => !window.overflowed,
        };
        self.replace(window, cursor);
        true
    }

    pub fn toggle_expanded(&mut self, title: &str) {
        if !self.expanded.remove(title) {
            self.expanded.insert(title.to_string());
        }
    }

    pub fn is_expanded(&self, title: &str) -> bool {
        self.expanded.contains(title)
    }

    pub(crate) fn articles_mut(&mut self) -> impl Iterator<Item = &mut Article> {
        self.window.items.iter_mut()
    }

    fn replace(&mut self, window: Window, cursor: CursorState) {
        self.window = window;
        self.cursor = cursor;
        self.expanded.clear();
    }
}

/// Reduces a raw over-fetched reply into the displayed window.
///
/// `raw` is in traversal order: ascending for forward fetches, descending for
/// backward ones. The result is always ascending by title.
pub fn reduce_page(
    mut raw: Vec<Article>,
    anchor: Option<&str>,
    count: usize,
    direction: Direction,
) -> (Window, CursorState) {
    let overflowed = raw.len() > count;
    let next_key = match direction {
        Direction::Forward => {
            let next_key = raw.get(count).map(|article| article.title.clone());
            raw.truncate(count);
            next_key
        }
        Direction::Backward => {
            // The surplus is the item farthest back; the page that follows
            // starts at the title we retreated from.
            raw.truncate(count);
            raw.reverse();
            anchor.map(ToOwned::to_owned)
        }
    };

    let anchor_key = raw.first().map(|article| article.title.clone());
    (
        Window {
            items: raw,
            size: count,
            overflowed,
        },
        CursorState {
            anchor_key,
            direction,
            next_key,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{reduce_page, Direction};
    use crate::Article;

    fn articles(titles: &[&str]) -> Vec<Article> {
        titles.iter().map(|title| Article::new(*title, "")).collect()
    }

    fn titles(items: &[Article]) -> Vec<&str> {
        items.iter().map(|article| article.title.as_str()).collect()
    }

    #[test]
    fn forward_overflow_takes_next_key_from_lookahead() {
        let (window, cursor) = reduce_page(articles(&["a", "b", "c"]), None, 2, Direction::Forward);
        assert_eq!(titles(&window.items), vec!["a", "b"]);
        assert!(window.overflowed);
        assert_eq!(cursor.next_key.as_deref(), Some("c"));
        assert_eq!(cursor.anchor_key.as_deref(), Some("a"));
    }

    #[test]
    fn exact_page_has_no_next_key() {
        let raw = articles(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let (window, cursor) = reduce_page(raw, None, 10, Direction::Forward);
        assert_eq!(window.items.len(), 10);
        assert!(!window.overflowed);
        assert_eq!(cursor.next_key, None);
    }

    #[test]
    fn backward_reply_is_reversed_and_drops_farthest_item() {
        let (window, cursor) =
            reduce_page(articles(&["f", "e", "d", "c"]), Some("g"), 3, Direction::Backward);
        assert_eq!(titles(&window.items), vec!["d", "e", "f"]);
        assert!(window.overflowed);
        assert_eq!(cursor.anchor_key.as_deref(), Some("d"));
        assert_eq!(cursor.next_key.as_deref(), Some("g"));
        assert_eq!(cursor.direction, Direction::Backward);
    }

    #[test]
    fn empty_reply_yields_empty_window() {
        let (window, cursor) = reduce_page(Vec::new(), None, 5, Direction::Forward);
        assert!(window.items.is_empty());
        assert!(!window.overflowed);
        assert_eq!(cursor.anchor_key, None);
        assert_eq!(cursor.next_key, None);
    }
}
