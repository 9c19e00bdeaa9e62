use std::fmt::Write;

use corpus_core::{AppViewModel, JobState, Preview, ViewMode};

/// Renders the view model as plain text for the terminal.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==== {:?} ====", view.mode);
    match view.mode {
        ViewMode::Browse => render_browse(&mut out, view),
        ViewMode::Members => render_members(&mut out, view),
        ViewMode::Jobs => render_job(&mut out, view),
    }
    render_search(&mut out, view);
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    out
}

fn render_browse(out: &mut String, view: &AppViewModel) {
    let browse = &view.browse;
    let max_page = browse
        .max_page
        .map_or_else(|| "?".to_string(), |max| max.to_string());
    let _ = writeln!(
        out,
        "page {}/{} ({} per page){}",
        browse.page,
        max_page,
        browse.page_size,
        if browse.loading { " loading..." } else { "" }
    );
    if let Some(error) = &browse.error {
        let _ = writeln!(out, "error: {error}");
    }
    for row in &browse.rows {
        let index = row
            .index
            .map_or_else(|| "-".to_string(), |index| index.to_string());
        let marker = if row.member { "*" } else { " " };
        let _ = writeln!(out, "{marker} #{index:<6} {}", row.title);
        if row.expanded {
            write_preview(out, &row.preview);
        }
    }
}

fn render_members(out: &mut String, view: &AppViewModel) {
    let members = &view.members;
    let _ = writeln!(
        out,
        "from {:?}, {} per window [prev:{} next:{}]{}",
        members.anchor.as_deref().unwrap_or(""),
        members.count,
        if members.has_prev { "yes" } else { "no" },
        if members.has_next { "yes" } else { "no" },
        if members.loading { " loading..." } else { "" }
    );
    if let Some(error) = &members.error {
        let _ = writeln!(out, "error: {error}");
    }
    for row in &members.rows {
        let _ = writeln!(out, "  {}", row.title);
        if row.expanded {
            write_preview(out, &row.preview);
        }
    }
}

fn render_job(out: &mut String, view: &AppViewModel) {
    let job = &view.job;
    match &job.state {
        JobState::Idle => {
            let _ = writeln!(out, "job idle");
        }
        JobState::Running => {
            let _ = writeln!(out, "job running (polling: {})", job.live_timers == 1);
        }
        JobState::Completed(results) => {
            let _ = writeln!(out, "job completed\n{results}");
        }
        JobState::CompletedPartial(partial) => {
            let _ = writeln!(
                out,
                "job finished without results\n{}",
                partial.as_deref().unwrap_or("")
            );
        }
    }
    if let Some(error) = &job.error {
        let _ = writeln!(out, "last poll error: {error}");
    }
}

fn render_search(out: &mut String, view: &AppViewModel) {
    let search = &view.search;
    if search.query.is_empty() {
        return;
    }
    let _ = writeln!(
        out,
        "---- search {:?}{} ----",
        search.query,
        if search.loading { " loading..." } else { "" }
    );
    if let Some(error) = &search.error {
        let _ = writeln!(out, "search failed: {error}");
    }
    for hit in &search.hits {
        let _ = writeln!(out, "  {}", terminal_marks(&hit.title));
        for line in terminal_marks(&hit.highlighted).lines() {
            let _ = writeln!(out, "      {line}");
        }
        if hit.preview.truncated_after {
            let _ = writeln!(out, "      \u{2026}");
        }
    }
}

fn write_preview(out: &mut String, preview: &Preview) {
    for line in preview.text.lines() {
        let _ = writeln!(out, "      {line}");
    }
    if preview.truncated_after {
        let _ = writeln!(out, "      \u{2026}");
    }
}

/// Turns escaped `<mark>` markup into bracketed plain text.
fn terminal_marks(markup: &str) -> String {
    markup
        .replace("<mark>", "[")
        .replace("</mark>", "]")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use corpus_core::{update, AppState, Effect, Msg, SearchHit};

    use super::render;

    #[test]
    fn search_hits_show_bracketed_matches() {
        let (state, effects) = update(AppState::new(), Msg::SearchSubmitted("b".to_string()));
        let Some(Effect::Search { seq, .. }) = effects.first().cloned() else {
            panic!("expected search effect");
        };
        let (state, _) = update(
            state,
            Msg::SearchLoaded {
                seq,
                result: Ok(vec![SearchHit {
                    title: "Abc".to_string(),
                    text: "a\nb\nc".to_string(),
                }]),
            },
        );

        let text = render(&state.view());
        assert!(text.contains("  A[b]c"), "{text}");
        assert!(text.contains("      [b]"), "{text}");
    }

    #[test]
    fn literal_markup_in_articles_is_not_taken_for_matches() {
        let (state, effects) = update(AppState::new(), Msg::SearchSubmitted("b".to_string()));
        let Some(Effect::Search { seq, .. }) = effects.first().cloned() else {
            panic!("expected search effect");
        };
        let (state, _) = update(
            state,
            Msg::SearchLoaded {
                seq,
                result: Ok(vec![SearchHit {
                    title: "<mark>b & a".to_string(),
                    text: "x <mark>b</mark> &amp;".to_string(),
                }]),
            },
        );

        let text = render(&state.view());
        assert!(text.contains("  <mark>[b] & a"), "{text}");
        assert!(text.contains("      x <mark>[b]</mark> &amp;"), "{text}");
    }
}
