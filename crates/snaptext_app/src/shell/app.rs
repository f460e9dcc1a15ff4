use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use clap::Parser;
use snaptext_core::{update, AppState, AppViewModel, Msg, WorkflowState};
use snaptext_engine::{ensure_output_dir, EngineHandle, ReqwestExtractor};
use snaptext_logging::{snap_debug, snap_info, snap_warn};

use super::cli::Cli;
use super::clipboard::SystemClipboard;
use super::commands::{self, ShellCommand, HELP};
use super::config;
use super::effects::{EffectRunner, MsgSink};
use super::intake;
use super::logging;
use super::render;

/// Everything the event thread reacts to.
#[derive(Debug)]
pub enum ShellEvent {
    Line(String),
    InputClosed,
    Dispatch(Msg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_config = config::load_file_config(cli.config.as_deref())?;
    let config = config::resolve(&cli, file_config)?;
    logging::initialize(config.log, config.log_level);
    snap_info!(
        "Starting snaptext: endpoint={} timeout={:?} export_dir={:?}",
        config.client.endpoint,
        config.client.request_timeout,
        config.export_dir
    );

    let (event_tx, event_rx) = mpsc::channel::<ShellEvent>();
    let extractor = ReqwestExtractor::new(config.client.clone())?;
    let engine = EngineHandle::new(
        Arc::new(extractor),
        Arc::new(MsgSink::new(event_tx.clone())),
    )?;
    if let Err(err) = ensure_output_dir(&config.export_dir) {
        snap_warn!("Export directory check failed: {}", err);
    }
    let runner = EffectRunner::new(
        engine,
        Box::new(SystemClipboard::new()),
        config.export_dir.clone(),
    );
    let mut shell = terminal_shell(runner);

    spawn_stdin_reader(event_tx);
    shell.start(cli.image.as_deref())?;
    pump(&mut shell, &event_rx)?;

    snap_info!("snaptext exiting");
    Ok(())
}

/// Writes through `io::stdout()`, which locks per write. The engine thread
/// logs to the same terminal and must never wait on the shell.
fn terminal_shell(effects: EffectRunner) -> Shell<io::Stdout> {
    Shell::new(effects, io::stdout())
}

/// Handles events until `quit`, or until input has ended and no conversion
/// is left in flight.
fn pump<W: Write>(shell: &mut Shell<W>, events: &mpsc::Receiver<ShellEvent>) -> io::Result<()> {
    let mut input_closed = false;
    while let Ok(event) = events.recv() {
        match event {
            ShellEvent::Line(line) => {
                if shell.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
            ShellEvent::Dispatch(msg) => {
                shell.dispatch(msg)?;
                if !input_closed {
                    shell.prompt()?;
                }
            }
            ShellEvent::InputClosed => {
                input_closed = true;
                if shell.is_converting() {
                    snap_info!("Input closed; waiting for the conversion in flight");
                }
            }
        }
        if input_closed && !shell.is_converting() {
            break;
        }
    }
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<ShellEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(ShellEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    snap_warn!("Reading stdin failed: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(ShellEvent::InputClosed);
    });
}

/// Owns the workflow state; the only place it is mutated.
pub struct Shell<W: Write> {
    state: AppState,
    effects: EffectRunner,
    out: W,
    last_rendered: Option<AppViewModel>,
}

impl<W: Write> Shell<W> {
    pub fn new(effects: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            effects,
            out,
            last_rendered: None,
        }
    }

    pub fn is_converting(&self) -> bool {
        self.state.in_flight_token().is_some()
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn start(&mut self, image: Option<&Path>) -> io::Result<()> {
        writeln!(self.out, "SnapText: image to text. Type `help` for commands.")?;
        self.render()?;
        if let Some(path) = image {
            self.open(&[path.to_path_buf()])?;
        }
        self.prompt()
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match commands::parse(line) {
            ShellCommand::Empty => {}
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Help => writeln!(self.out, "{HELP}")?,
            ShellCommand::Show => {
                for line in render::render_text(&self.state.view()) {
                    writeln!(self.out, "{line}")?;
                }
            }
            ShellCommand::Open(paths) => self.open(&paths)?,
            ShellCommand::Dispatch(msg) => self.dispatch(msg)?,
            ShellCommand::Usage(usage) => writeln!(self.out, "{usage}")?,
            ShellCommand::Unknown(word) => writeln!(
                self.out,
                "Unknown command `{word}`. Type `help` for the list."
            )?,
        }
        self.prompt()?;
        Ok(Flow::Continue)
    }

    fn open(&mut self, paths: &[PathBuf]) -> io::Result<()> {
        match self.state.workflow_state() {
            WorkflowState::Converting => {
                return writeln!(self.out, "Conversion in progress; please wait.");
            }
            WorkflowState::ResultReady => {
                return writeln!(self.out, "Type `reset` before opening another image.");
            }
            WorkflowState::Idle | WorkflowState::ImageStaged => {}
        }
        match intake::offer_first(paths) {
            Ok(Some(offer)) => self.dispatch(Msg::FilesOffered(vec![offer])),
            Ok(None) => Ok(()),
            Err(err) => {
                snap_warn!("Intake failed: {}", err);
                writeln!(self.out, "Cannot open: {err}")
            }
        }
    }

    /// Applies `msg` and every message its effects produce, then renders once.
    pub fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let was_loading = self.state.view().is_loading;
            let user_action = is_user_action(&msg);
            if let Msg::ExtractionFinished { token, .. } = &msg {
                if self.state.in_flight_token() != Some(*token) {
                    snap_debug!("Discarding stale extraction result {}", token);
                }
            }
            let before = self.state.clone();

            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;

            if was_loading && user_action && effects.is_empty() && self.state == before {
                snap_debug!("Ignored user action while converting");
                writeln!(self.out, "Conversion in progress; please wait.")?;
            }
            queue.extend(self.effects.run(effects));
        }

        if self.state.consume_dirty() {
            self.render()?;
        }
        Ok(())
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "{}> ",
            render::state_label(self.state.workflow_state())
        )?;
        self.out.flush()
    }

    fn render(&mut self) -> io::Result<()> {
        let view = self.state.view();
        for line in render::render(&view, self.last_rendered.as_ref()) {
            writeln!(self.out, "{line}")?;
        }
        self.last_rendered = Some(view);
        Ok(())
    }
}

fn is_user_action(msg: &Msg) -> bool {
    matches!(
        msg,
        Msg::FilesOffered(_)
            | Msg::ConvertClicked
            | Msg::TextEdited(_)
            | Msg::TextAppended(_)
            | Msg::CopyClicked
            | Msg::DownloadClicked { .. }
    )
}
