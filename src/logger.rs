//! Diagnostic logging and progress reporting.
//!
//! Ordinary diagnostic messages go through the `log` facade the way the
//! rest of the ecosystem does; `log`'s global registration happens once in
//! `main` and is not read by the core codec. Progress reporting during a
//! potentially long encode/decode, by contrast, is a value-typed capability
//! (`ProgressSink`) threaded explicitly through the call — no global
//! "is a progress bar active" flag lives anywhere in this crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Initializes the global `log` dispatcher. `verbosity` follows the usual
/// `-v`/`-q` occurrence-counting convention: 0 is warnings and errors only,
/// each `-v` raises the floor by one level.
pub fn init(verbosity: i8) {
    let level = match verbosity {
        i8::MIN..=-1 => log::LevelFilter::Error,
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .filter_level(level)
        .try_init();
}

/// A sink that a long-running operation reports progress to. Implementors
/// own how (or whether) that progress reaches a human.
pub trait ProgressSink {
    fn begin(&self, label: &str, total: u64);
    fn advance(&self, amount: u64);
    fn finish(&self);
}

/// The default sink: drops every call. Used whenever the caller has not
/// opted into visible progress (library use, quiet CLI invocations).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn begin(&self, _label: &str, _total: u64) {}
    fn advance(&self, _amount: u64) {}
    fn finish(&self) {}
}

/// A terminal progress bar, used by the CLI when `-v` is given.
pub struct TerminalSink {
    bar: ProgressBar,
}

impl TerminalSink {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        TerminalSink { bar }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalSink {
    fn begin(&self, label: &str, total: u64) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_message(label.to_string());
    }

    fn advance(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
