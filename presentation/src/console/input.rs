//! Line input on a dedicated thread
//!
//! `rustyline` blocks, so the editor lives on its own thread and hands
//! finished lines to the async console. The thread prompts again only after
//! the console acknowledges the previous line, which keeps command output
//! from interleaving with the prompt.

use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, ExternalPrinter};
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// What the input thread reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// End of input (Ctrl-D or a closed pipe)
    Closed,
    Failed(String),
}

/// A blocking source of edited lines.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError>;

    /// Record a submitted, non-blank line in history.
    fn remember(&mut self, line: &str);

    /// Printer that can write above an active prompt, if the terminal has one.
    fn printer(&mut self) -> Option<Box<dyn ExternalPrinter + Send>> {
        None
    }
}

/// `rustyline` editor with optional on-disk history.
pub struct RustylineSource {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl RustylineSource {
    pub fn open(history: Option<PathBuf>) -> Result<Self, String> {
        let mut editor = DefaultEditor::new().map_err(|e| e.to_string())?;
        if let Some(path) = &history {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = editor.load_history(path);
        }
        Ok(Self { editor, history })
    }

    /// `<data dir>/synclab/history.txt`
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("synclab").join("history.txt"))
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.editor.readline(prompt)
    }

    fn remember(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
        if let Some(path) = &self.history
            && let Err(e) = self.editor.save_history(path)
        {
            debug!(path = %path.display(), "Could not save history: {}", e);
        }
    }

    fn printer(&mut self) -> Option<Box<dyn ExternalPrinter + Send>> {
        match self.editor.create_external_printer() {
            Ok(printer) => Some(Box::new(printer)),
            Err(e) => {
                debug!("No external printer: {}", e);
                None
            }
        }
    }
}

/// Async handle to the input thread.
pub struct LineInput {
    events: mpsc::UnboundedReceiver<InputEvent>,
    ready: std_mpsc::Sender<()>,
    printer: Option<Box<dyn ExternalPrinter + Send>>,
}

impl LineInput {
    /// Start the input thread. `open` runs on that thread, so the source
    /// itself never crosses threads.
    pub async fn spawn<S, F>(prompt: &'static str, open: F) -> std::io::Result<Self>
    where
        S: LineSource,
        F: FnOnce() -> Result<S, String> + Send + 'static,
    {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (ready, ready_rx) = std_mpsc::channel::<()>();
        let (printer_tx, printer_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("synclab-input".to_string())
            .spawn(move || {
                let mut source = match open() {
                    Ok(source) => source,
                    Err(e) => {
                        let _ = printer_tx.send(None);
                        let _ = events_tx.send(InputEvent::Failed(e));
                        return;
                    }
                };
                let _ = printer_tx.send(source.printer());

                loop {
                    match source.read_line(prompt) {
                        Ok(line) => {
                            if !line.trim().is_empty() {
                                source.remember(&line);
                            }
                            if events_tx.send(InputEvent::Line(line)).is_err()
                                || ready_rx.recv().is_err()
                            {
                                break;
                            }
                        }
                        Err(ReadlineError::Interrupted) => println!("^C"),
                        Err(ReadlineError::Eof) => {
                            let _ = events_tx.send(InputEvent::Closed);
                            break;
                        }
                        Err(e) => {
                            let _ = events_tx.send(InputEvent::Failed(e.to_string()));
                            break;
                        }
                    }
                }
                debug!("Input thread stopped");
            })?;

        Ok(Self {
            events,
            ready,
            printer: printer_rx.await.ok().flatten(),
        })
    }

    /// Next event. `None` once the thread is gone.
    pub async fn next(&mut self) -> Option<InputEvent> {
        self.events.recv().await
    }

    /// Let the thread prompt for the next line.
    pub fn ready(&self) {
        let _ = self.ready.send(());
    }

    /// Print while the prompt is showing, redrawing it below the text.
    pub fn print_above(&mut self, text: String) {
        match self.printer.as_mut() {
            Some(printer) => {
                if let Err(e) = printer.print(text.clone()) {
                    debug!("External printer failed: {}", e);
                    print!("{}", text);
                }
            }
            None => print!("{}", text),
        }
    }
}
