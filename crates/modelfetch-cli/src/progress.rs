//! Terminal rendering of engine progress events.
//!
//! A bar per active file when stdout is a terminal, throttled plain lines
//! otherwise.

use std::collections::HashMap;
use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{HumanBytes, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use modelfetch_core::{ProgressEvent, TaskState};
use modelfetch_download::ProgressThrottle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Longest file label shown before truncation.
const MAX_LABEL: usize = 40;

/// Interval between plain progress lines for one file.
const PLAIN_INTERVAL: Duration = Duration::from_secs(1);

/// Progress display that selects terminal or plain output.
pub struct ProgressPrinter {
    inner: ProgressRender,
}

enum ProgressRender {
    Fancy(FancyProgress),
    Plain(PlainProgress),
}

impl ProgressPrinter {
    /// Create a printer, auto-detecting terminal capability.
    pub fn new() -> Self {
        if io::stdout().is_terminal() {
            Self {
                inner: ProgressRender::Fancy(FancyProgress::new()),
            }
        } else {
            Self::plain()
        }
    }

    /// Create a printer that always writes plain lines.
    pub fn plain() -> Self {
        Self {
            inner: ProgressRender::Plain(PlainProgress::new()),
        }
    }

    /// Render one event.
    pub fn handle(&mut self, event: &ProgressEvent) {
        match &mut self.inner {
            ProgressRender::Fancy(inner) => inner.handle(event),
            ProgressRender::Plain(inner) => inner.handle(event),
        }
    }

    /// Clear any bars still on screen.
    pub fn finish(&mut self) {
        if let ProgressRender::Fancy(inner) = &mut self.inner {
            inner.finish();
        }
    }
}

impl Default for ProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render events from `rx` until every sender is dropped.
pub fn spawn_printer(mut rx: mpsc::Receiver<ProgressEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut printer = ProgressPrinter::new();
        while let Some(event) = rx.recv().await {
            printer.handle(&event);
        }
        printer.finish();
    })
}

// ============================================================================
// Fancy Terminal Progress (indicatif)
// ============================================================================

struct FancyProgress {
    multi: MultiProgress,
    bars: HashMap<usize, ProgressBar>,
}

impl FancyProgress {
    fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stdout()),
            bars: HashMap::new(),
        }
    }

    fn handle(&mut self, event: &ProgressEvent) {
        match event.state {
            TaskState::Pending => {}
            TaskState::Complete | TaskState::Failed => {
                if let Some(bar) = self.bars.remove(&event.index) {
                    bar.finish_and_clear();
                    self.multi.remove(&bar);
                }
            }
            TaskState::Starting | TaskState::Resuming | TaskState::Streaming => {
                let multi = &self.multi;
                let bar = self.bars.entry(event.index).or_insert_with(|| {
                    let bar = multi.add(ProgressBar::no_length());
                    bar.set_style(spinner_style());
                    bar.set_message(format_label(&event.file));
                    bar.enable_steady_tick(Duration::from_millis(120));
                    bar
                });

                if let Some(total) = event.total {
                    if bar.length() != Some(total) {
                        bar.set_style(bar_style());
                        bar.set_length(total);
                    }
                }
                bar.set_position(event.downloaded);
            }
        }
    }

    fn finish(&mut self) {
        for (_, bar) in self.bars.drain() {
            bar.finish_and_clear();
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg} {bytes}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg:40} {bar:28.cyan/blue} {bytes:>10} / {total_bytes:>10} @ {binary_bytes_per_sec} ETA {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn format_label(raw: &str) -> String {
    let char_count = raw.chars().count();
    if char_count <= MAX_LABEL {
        return raw.to_string();
    }
    // Keep the tail: the file name is the informative part
    let tail: String = raw.chars().skip(char_count - (MAX_LABEL - 1)).collect();
    format!("…{tail}")
}

// ============================================================================
// Plain Progress (non-terminal)
// ============================================================================

struct PlainProgress {
    throttle: ProgressThrottle,
}

impl PlainProgress {
    fn new() -> Self {
        Self {
            throttle: ProgressThrottle::new(PLAIN_INTERVAL),
        }
    }

    fn handle(&mut self, event: &ProgressEvent) {
        if event.state == TaskState::Pending || !self.throttle.should_emit(event) {
            return;
        }
        println!("{}", plain_line(event));
        if event.state.is_terminal() {
            self.throttle.reset(event.index);
        }
    }
}

fn plain_line(event: &ProgressEvent) -> String {
    let amount = match event.total {
        Some(total) if total > 0 => {
            #[allow(clippy::cast_precision_loss)]
            let percent = event.downloaded as f64 / total as f64 * 100.0;
            format!(
                "{} / {} ({percent:.1}%)",
                HumanBytes(event.downloaded),
                HumanBytes(total)
            )
        }
        _ => HumanBytes(event.downloaded).to_string(),
    };
    format!("[{}] {} {amount}", event.state.as_str(), event.file)
}
