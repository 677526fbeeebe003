//! Terminal plumbing for [`super::trace`]: depth tracking and the actual
//! line-writing, split out so the public `trace` wrapper stays readable.
//!
//! Call-column width falls back to `COLUMNS` or a terminal query, then 80.
//! The right-hand column prints the [`Position`][crate::position::Position]
//! the call started at rather than a raw input dump, since streams here
//! aren't required to be `Debug`-able.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

static DEPTH: AtomicUsize = AtomicUsize::new(0);

/// RAII guard bumping the shared depth counter for the lifetime of one
/// traced call, so nested `trace` calls indent further than their parent.
pub struct Depth(usize);

impl Depth {
    pub fn new() -> Self {
        Self(DEPTH.fetch_add(1, Ordering::SeqCst))
    }
}

impl Drop for Depth {
    fn drop(&mut self) {
        let _ = DEPTH.fetch_sub(1, Ordering::SeqCst);
    }
}

impl crate::lib::std::ops::Deref for Depth {
    type Target = usize;

    #[inline(always)]
    fn deref(&self) -> &usize {
        &self.0
    }
}

/// Which of the four outcomes (consumed/empty × ok/error) a call ended in.
pub enum Severity {
    ConsumedOk,
    EmptyOk,
    ConsumedErr,
    EmptyErr,
}

impl Severity {
    pub fn classify(consumed: bool, is_ok: bool) -> Self {
        match (consumed, is_ok) {
            (true, true) => Self::ConsumedOk,
            (false, true) => Self::EmptyOk,
            (true, false) => Self::ConsumedErr,
            (false, false) => Self::EmptyErr,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::ConsumedOk => "ok, consumed",
            Self::EmptyOk => "ok, empty",
            Self::ConsumedErr => "err, consumed",
            Self::EmptyErr => "err, empty",
        }
    }

    fn style(&self) -> anstyle::Style {
        let color = match self {
            Self::ConsumedOk | Self::EmptyOk => anstyle::AnsiColor::Green,
            Self::ConsumedErr | Self::EmptyErr => anstyle::AnsiColor::Red,
        };
        anstyle::Style::new().fg_color(Some(color.into()))
    }
}

pub fn start(
    depth: usize,
    name: &dyn crate::lib::std::fmt::Display,
    count: usize,
    position: &crate::position::Position,
) {
    let gutter_style = anstyle::Style::new().bold();
    let position_style = anstyle::Style::new().underline();

    let call_width = column_width();
    let count = if 0 < count {
        format!(":{count}")
    } else {
        "".to_owned()
    };
    let call_column = format!("{:depth$}> {name}{count}", "");

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{call_column:call_width$} {gutter_style}|{gutter_reset} {position_style}at {position}{position_reset}",
        gutter_style = gutter_style.render(),
        gutter_reset = gutter_style.render_reset(),
        position_style = position_style.render(),
        position_reset = position_style.render_reset(),
    );
}

pub fn end(depth: usize, name: &dyn crate::lib::std::fmt::Display, count: usize, severity: Severity) {
    let gutter_style = anstyle::Style::new().bold();
    let status_style = severity.style();

    let call_width = column_width();
    let count = if 0 < count {
        format!(":{count}")
    } else {
        "".to_owned()
    };
    let call_column = format!("{:depth$}< {name}{count}", "");

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{status_style}{call_column:call_width$}{status_reset} {gutter_style}|{gutter_reset} {status_style}{status}{status_reset}",
        gutter_style = gutter_style.render(),
        gutter_reset = gutter_style.render_reset(),
        status_style = status_style.render(),
        status_reset = status_style.render_reset(),
        status = severity.label(),
    );
}

fn column_width() -> usize {
    let min_call_width = 40;
    term_width().max(min_call_width)
}

fn term_width() -> usize {
    columns_env().or_else(query_width).unwrap_or(80)
}

fn query_width() -> Option<usize> {
    use is_terminal_polyfill::IsTerminal;
    if std::io::stderr().is_terminal() {
        terminal_size::terminal_size().map(|(w, _h)| w.0.into())
    } else {
        None
    }
}

fn columns_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse::<usize>().ok())
}
