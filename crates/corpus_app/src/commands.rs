use corpus_core::{Msg, ViewMode};

pub const HELP: &str = "\
commands:
  browse | members | jobs      switch view
  next | prev                  page forward/back in the current view
  size N                       browse page size
  page N                       jump to browse page N
  from TITLE                   members window starting title (empty = start)
  count N                      members window length
  open TITLE | open #INDEX     toggle article details
  add INDEX | remove TITLE     change membership
  search QUERY                 server-side search (blank clears)
  run                          start the job
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Msg(Msg),
    Help,
    Quit,
    Invalid(String),
}

/// Parses one line of user input. `mode` decides what `next`/`prev` page.
pub fn parse(line: &str, mode: ViewMode) -> Input {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word {
        "" => Msg::Tick,
        "browse" => Msg::NavigateTo(ViewMode::Browse),
        "members" => Msg::NavigateTo(ViewMode::Members),
        "jobs" => Msg::NavigateTo(ViewMode::Jobs),
        "next" if mode == ViewMode::Members => Msg::CursorNext,
        "next" => Msg::OffsetNextPage,
        "prev" if mode == ViewMode::Members => Msg::CursorPrev,
        "prev" => Msg::OffsetPrevPage,
        "size" => match rest.parse() {
            Ok(size) => Msg::OffsetPageSizeChanged(size),
            Err(_) => return Input::Invalid(format!("not a page size: {rest:?}")),
        },
        "page" => match rest.parse() {
            Ok(page) => Msg::OffsetPageChanged(page),
            Err(_) => return Input::Invalid(format!("not a page number: {rest:?}")),
        },
        "count" => match rest.parse() {
            Ok(count) => Msg::CursorCountChanged(count),
            Err(_) => return Input::Invalid(format!("not a count: {rest:?}")),
        },
        "from" => Msg::CursorAnchorChanged(rest.to_string()),
        "open" => match rest.strip_prefix('#') {
            Some(index) => match index.parse() {
                Ok(index) => Msg::OffsetRowToggled { index },
                Err(_) => return Input::Invalid(format!("not an index: {index:?}")),
            },
            None => Msg::CursorRowToggled {
                title: rest.to_string(),
            },
        },
        "add" => match rest.parse() {
            Ok(index) => Msg::AddMemberClicked { index },
            Err(_) => return Input::Invalid(format!("not an index: {rest:?}")),
        },
        "remove" if !rest.is_empty() => Msg::RemoveMemberClicked {
            title: rest.to_string(),
        },
        "search" => Msg::SearchSubmitted(rest.to_string()),
        "run" => Msg::RunJobClicked,
        "help" => return Input::Help,
        "quit" | "exit" => return Input::Quit,
        other => return Input::Invalid(format!("unknown command {other:?}")),
    };
    Input::Msg(msg)
}

#[cfg(test)]
mod tests {
    use corpus_core::{Msg, ViewMode};

    use super::{parse, Input};

    #[test]
    fn next_follows_active_view() {
        assert_eq!(parse("next", ViewMode::Members), Input::Msg(Msg::CursorNext));
        assert_eq!(parse("next", ViewMode::Browse), Input::Msg(Msg::OffsetNextPage));
        assert_eq!(parse("prev", ViewMode::Jobs), Input::Msg(Msg::OffsetPrevPage));
    }

    #[test]
    fn arguments_keep_inner_spaces() {
        assert_eq!(
            parse("search  New York City ", ViewMode::Browse),
            Input::Msg(Msg::SearchSubmitted("New York City".to_string()))
        );
        assert_eq!(
            parse("remove Rust (programming language)", ViewMode::Members),
            Input::Msg(Msg::RemoveMemberClicked {
                title: "Rust (programming language)".to_string()
            })
        );
    }

    #[test]
    fn numeric_arguments_are_validated() {
        assert_eq!(parse("size 25", ViewMode::Browse), Input::Msg(Msg::OffsetPageSizeChanged(25)));
        assert!(matches!(parse("size many", ViewMode::Browse), Input::Invalid(_)));
        assert_eq!(
            parse("open #12", ViewMode::Browse),
            Input::Msg(Msg::OffsetRowToggled { index: 12 })
        );
    }

    #[test]
    fn empty_from_resets_to_start() {
        assert_eq!(
            parse("from", ViewMode::Members),
            Input::Msg(Msg::CursorAnchorChanged(String::new()))
        );
    }

    #[test]
    fn quit_and_unknown() {
        assert_eq!(parse("quit", ViewMode::Browse), Input::Quit);
        assert!(matches!(parse("frobnicate", ViewMode::Browse), Input::Invalid(_)));
    }
}
