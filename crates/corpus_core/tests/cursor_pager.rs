use std::sync::Once;

use corpus_core::{Article, CursorPager, Direction, PageRequest};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(corpus_logging::initialize_for_tests);
}

/// In-memory stand-in for the cursor endpoint: forward reads include
/// `start_title`, backward reads start just before it.
struct Corpus {
    titles: Vec<String>,
}

impl Corpus {
    fn letters(n: u8) -> Self {
        Self {
            titles: (0..n).map(|i| char::from(b'a' + i).to_string()).collect(),
        }
    }

    fn serve(&self, request: &PageRequest) -> Vec<Article> {
        let titles: Vec<&String> = if request.forward {
            self.titles
                .iter()
                .filter(|title| {
                    request
                        .start_title
                        .as_ref()
                        .map_or(true, |start| *title >= start)
                })
                .take(request.count)
                .collect()
        } else {
            self.titles
                .iter()
                .rev()
                .filter(|title| {
                    request
                        .start_title
                        .as_ref()
                        .map_or(true, |start| *title < start)
                })
                .take(request.count)
                .collect()
        };
        titles
            .into_iter()
            .map(|title| Article::new(title.clone(), format!("text of {title}")))
            .collect()
    }
}

fn run(pager: &mut CursorPager, corpus: &Corpus, request: PageRequest) {
    let reply = corpus.serve(&request);
    assert!(pager.apply(request.seq, Ok(reply)));
}

fn window_titles(pager: &CursorPager) -> Vec<String> {
    pager
        .window()
        .items
        .iter()
        .map(|article| article.title.clone())
        .collect()
}

#[test]
fn load_requests_one_extra_item() {
    init_logging();
    let mut pager = CursorPager::new(10);
    let request = pager.load_from(Some("m".to_string()), 10, Direction::Backward);
    assert_eq!(request.count, 11);
    assert!(!request.forward);
    assert_eq!(request.start_title.as_deref(), Some("m"));
}

#[test]
fn forward_window_never_exceeds_count_and_reports_next_key() {
    init_logging();
    let corpus = Corpus::letters(26);
    for count in 1..=12 {
        let mut pager = CursorPager::new(count);
        let request = pager.load_from(None, count, Direction::Forward);
        run(&mut pager, &corpus, request);

        let window = pager.window();
        assert!(window.items.len() <= count);
        assert!(window.overflowed);
        assert_eq!(
            pager.cursor().next_key.as_deref(),
            Some(corpus.titles[count].as_str())
        );
        assert_eq!(pager.cursor().anchor_key.as_deref(), Some("a"));
    }
}

#[test]
fn exact_fit_has_no_next_page() {
    init_logging();
    let corpus = Corpus::letters(10);
    let mut pager = CursorPager::new(10);
    let request = pager.load_from(None, 10, Direction::Forward);
    run(&mut pager, &corpus, request);

    assert_eq!(pager.window().items.len(), 10);
    assert!(!pager.window().overflowed);
    assert_eq!(pager.cursor().next_key, None);
    assert!(pager.advance().is_none());
}

#[test]
fn empty_corpus_yields_empty_window() {
    init_logging();
    let corpus = Corpus { titles: Vec::new() };
    let mut pager = CursorPager::new(5);
    let request = pager.load_from(None, 5, Direction::Forward);
    run(&mut pager, &corpus, request);

    assert!(pager.window().items.is_empty());
    assert_eq!(pager.cursor().next_key, None);
    assert_eq!(pager.cursor().anchor_key, None);
    assert!(!pager.can_retreat());
}

#[test]
fn identical_loads_yield_identical_windows() {
    init_logging();
    let corpus = Corpus::letters(20);
    let mut pager = CursorPager::new(4);

    let request = pager.load_from(Some("e".to_string()), 4, Direction::Forward);
    run(&mut pager, &corpus, request);
    let first = (pager.window().clone(), pager.cursor().clone());

    let request = pager.load_from(Some("e".to_string()), 4, Direction::Forward);
    run(&mut pager, &corpus, request);
    assert_eq!((pager.window().clone(), pager.cursor().clone()), first);
}

#[test]
fn advance_then_retreat_returns_to_the_same_first_title() {
    init_logging();
    let corpus = Corpus::letters(26);
    let mut pager = CursorPager::new(3);
    let request = pager.load_from(None, 3, Direction::Forward);
    run(&mut pager, &corpus, request);

    // Walk a few pages in, checking the round trip from each position.
    for _ in 0..5 {
        let before = window_titles(&pager);
        let request = pager.advance().expect("next page");
        run(&mut pager, &corpus, request);
        let after_advance = pager.cursor().anchor_key.clone();

        let request = pager.retreat().expect("previous page");
        run(&mut pager, &corpus, request);
        assert_eq!(window_titles(&pager), before);
        assert_eq!(pager.cursor().next_key, after_advance);

        let request = pager.advance().expect("next page again");
        run(&mut pager, &corpus, request);
    }
}

#[test]
fn retreat_to_start_disables_further_retreat() {
    init_logging();
    let corpus = Corpus::letters(8);
    let mut pager = CursorPager::new(3);
    let request = pager.load_from(None, 3, Direction::Forward);
    run(&mut pager, &corpus, request);
    assert!(!pager.can_retreat());
    assert!(pager.retreat().is_none());

    let request = pager.advance().expect("next page");
    run(&mut pager, &corpus, request);
    assert_eq!(window_titles(&pager), vec!["d", "e", "f"]);

    let request = pager.retreat().expect("previous page");
    run(&mut pager, &corpus, request);
    assert_eq!(window_titles(&pager), vec!["a", "b", "c"]);
    assert!(!pager.window().overflowed);
    assert!(!pager.can_retreat());
}

#[test]
fn backward_reply_with_nothing_keeps_current_window() {
    init_logging();
    let corpus = Corpus::letters(8);
    let mut pager = CursorPager::new(3);
    let request = pager.set_anchor("a");
    run(&mut pager, &corpus, request);
    assert!(pager.can_retreat());

    let request = pager.retreat().expect("previous page");
    run(&mut pager, &corpus, request);
    assert_eq!(window_titles(&pager), vec!["a", "b", "c"]);
    assert!(!pager.can_retreat());
}

#[test]
fn stale_reply_does_not_clobber_newer_window() {
    init_logging();
    let corpus = Corpus::letters(26);
    let mut pager = CursorPager::new(3);

    let old = pager.set_anchor("a");
    let new = pager.set_anchor("m");
    run(&mut pager, &corpus, new);
    assert_eq!(window_titles(&pager), vec!["m", "n", "o"]);

    assert!(!pager.apply(old.seq, Ok(corpus.serve(&old))));
    assert_eq!(window_titles(&pager), vec!["m", "n", "o"]);
}

#[test]
fn failure_resets_window_and_next_key() {
    init_logging();
    let corpus = Corpus::letters(26);
    let mut pager = CursorPager::new(3);
    let request = pager.load_from(None, 3, Direction::Forward);
    run(&mut pager, &corpus, request);

    let request = pager.advance().expect("next page");
    assert!(pager.apply(request.seq, Err("connection refused".to_string())));
    assert!(pager.window().items.is_empty());
    assert_eq!(pager.cursor().next_key, None);
    assert_eq!(pager.error(), Some("connection refused"));
    assert!(!pager.is_loading());
}

#[test]
fn expansion_is_keyed_by_title_and_cleared_on_reload() {
    init_logging();
    let corpus = Corpus::letters(26);
    let mut pager = CursorPager::new(3);
    let request = pager.load_from(None, 3, Direction::Forward);
    run(&mut pager, &corpus, request);

    pager.toggle_expanded("b");
    assert!(pager.is_expanded("b"));

    let request = pager.reload();
    run(&mut pager, &corpus, request);
    assert!(!pager.is_expanded("b"));
}

#[test]
fn count_change_reloads_from_current_anchor() {
    init_logging();
    let corpus = Corpus::letters(26);
    let mut pager = CursorPager::new(3);
    let request = pager.set_anchor("f");
    run(&mut pager, &corpus, request);

    let request = pager.set_count(5);
    assert_eq!(request.start_title.as_deref(), Some("f"));
    assert_eq!(request.count, 6);
    run(&mut pager, &corpus, request);
    assert_eq!(window_titles(&pager), vec!["f", "g", "h", "i", "j"]);
    assert_eq!(pager.cursor().next_key.as_deref(), Some("k"));
}

#[test]
fn oversized_count_saturates_lookahead_and_shows_whole_corpus() {
    init_logging();
    let corpus = Corpus::letters(4);
    let mut pager = CursorPager::new(3);
    let request = pager.load_from(None, usize::MAX, Direction::Forward);
    assert_eq!(request.count, usize::MAX);
    run(&mut pager, &corpus, request);
    assert_eq!(window_titles(&pager), vec!["a", "b", "c", "d"]);
    assert!(!pager.can_advance());
}
