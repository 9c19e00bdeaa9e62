mod commands;
mod effects;
mod render;
mod settings;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use corpus_client::EngineHandle;
use corpus_core::{update, AppState, Msg};
use corpus_logging::{corpus_info, LevelFilter, LogDestination};

use commands::{parse, Input, HELP};
use effects::EffectRunner;
use settings::{AppSettings, DEFAULT_SETTINGS_FILE};

const LOG_FILE: &str = "./corpus.log";

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = AppSettings::load(&settings_path)?;

    let destination = if settings.log_to_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    corpus_logging::initialize(destination, LevelFilter::Info, Path::new(LOG_FILE));
    corpus_info!("using {} ({:?})", settings.base_url, settings_path);

    let engine = EngineHandle::new(settings.client_settings()).context("starting engine")?;
    let mut app = App {
        state: AppState::with_settings(&settings.core_settings()),
        runner: EffectRunner::new(engine),
    };

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{HELP}");
    app.dispatch(Msg::Init);

    loop {
        match line_rx.recv_timeout(Duration::from_millis(20)) {
            Ok(line) => match parse(&line, app.state.mode()) {
                Input::Msg(msg) => app.dispatch(msg),
                Input::Help => println!("{HELP}"),
                Input::Quit => break,
                Input::Invalid(reason) => println!("{reason}"),
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        for msg in app.runner.poll() {
            app.dispatch(msg);
        }
    }

    corpus_info!("bye");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);
        if state.consume_dirty() {
            print!("{}", render::render(&state.view()));
        }
        self.state = state;
    }
}
