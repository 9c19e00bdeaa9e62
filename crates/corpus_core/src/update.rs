use corpus_logging::corpus_warn;

use crate::{AppState, Effect, Msg, ViewMode};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Init => {
            let mut effects = vec![Effect::FetchOffsetPage(state.offset_mut().load())];
            effects.extend(state.poller_mut().enter_foreground());
            state.mark_dirty();
            effects
        }
        Msg::NavigateTo(mode) => navigate_to(&mut state, mode),
        Msg::OffsetNextPage => {
            state.mark_dirty();
            vec![Effect::FetchOffsetPage(state.offset_mut().next_page())]
        }
        Msg::OffsetPrevPage => match state.offset_mut().prev_page() {
            Some(request) => {
                state.mark_dirty();
                vec![Effect::FetchOffsetPage(request)]
            }
            None => Vec::new(),
        },
        Msg::OffsetPageSizeChanged(size) => {
            state.mark_dirty();
            vec![Effect::FetchOffsetPage(state.offset_mut().set_page_size(size))]
        }
        Msg::OffsetPageChanged(page) => {
            state.mark_dirty();
            vec![Effect::FetchOffsetPage(state.offset_mut().set_page(page))]
        }
        Msg::OffsetPageLoaded { seq, result } => {
            if state.offset_mut().apply(seq, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CursorAnchorChanged(title) => {
            state.mark_dirty();
            vec![Effect::FetchCursorPage(state.cursor_mut().set_anchor(title))]
        }
        Msg::CursorCountChanged(count) => {
            state.mark_dirty();
            vec![Effect::FetchCursorPage(state.cursor_mut().set_count(count))]
        }
        Msg::CursorNext => match state.cursor_mut().advance() {
            Some(request) => {
                state.mark_dirty();
                vec![Effect::FetchCursorPage(request)]
            }
            None => Vec::new(),
        },
        Msg::CursorPrev => match state.cursor_mut().retreat() {
            Some(request) => {
                state.mark_dirty();
                vec![Effect::FetchCursorPage(request)]
            }
            None => Vec::new(),
        },
        Msg::CursorPageLoaded { seq, result } => {
            if state.cursor_mut().apply(seq, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CursorRowToggled { title } => {
            state.cursor_mut().toggle_expanded(&title);
            state.mark_dirty();
            Vec::new()
        }
        Msg::OffsetRowToggled { index } => {
            state.offset_mut().toggle_expanded(index);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddMemberClicked { index } => {
            state.mark_member(Some(index), None, true);
            state.mark_dirty();
            vec![Effect::AddMember { index }]
        }
        Msg::RemoveMemberClicked { title } => {
            state.mark_member(None, Some(&title), false);
            state.mark_dirty();
            vec![Effect::RemoveMember { title }]
        }
        Msg::MembershipUpdated {
            title,
            removed,
            result,
        } => match result {
            Ok(()) if removed => {
                state.set_notice(None);
                state.mark_dirty();
                vec![Effect::FetchCursorPage(state.cursor_mut().reload())]
            }
            Ok(()) => Vec::new(),
            Err(message) => {
                // No rollback: the next reload is the only correction.
                corpus_warn!("membership update for {:?} failed: {}", title, message);
                state.set_notice(Some(format!("membership update failed: {message}")));
                state.mark_dirty();
                Vec::new()
            }
        },
        Msg::SearchSubmitted(query) => {
            state.mark_dirty();
            let search = state.search_mut();
            match search.submit(&query) {
                Some(seq) => vec![Effect::Search {
                    seq,
                    query: search.query().to_string(),
                }],
                None => Vec::new(),
            }
        }
        Msg::SearchLoaded { seq, result } => {
            if state.search_mut().apply(seq, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RunJobClicked => {
            state.mark_dirty();
            state.poller_mut().start()
        }
        Msg::JobStarted { result } => {
            state.mark_dirty();
            state.poller_mut().job_started(result)
        }
        Msg::JobStatusLoaded { seq, result } => {
            let before = state.poller().clone();
            let effects = state.poller_mut().apply_status(seq, result);
            if state.poller() != &before {
                state.mark_dirty();
            }
            effects
        }
        Msg::TimerFired { timer } => state.poller_mut().timer_fired(timer),
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

/// Switches the active view and returns the I/O the new view needs.
pub fn navigate_to(state: &mut AppState, mode: ViewMode) -> Vec<Effect> {
    state.set_mode(mode);
    state.mark_dirty();
    match mode {
        ViewMode::Browse => Vec::new(),
        ViewMode::Members => vec![Effect::FetchCursorPage(state.cursor_mut().reload())],
        ViewMode::Jobs => state.poller_mut().enter_foreground(),
    }
}
