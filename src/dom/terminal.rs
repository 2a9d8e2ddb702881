use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use regex::{Captures, Regex};

use super::{Dom, MemoryDom, RESULT_OUTPUT};
use crate::output::LOADING_HTML;

const ERROR_OPEN: &str = r#"<div class="alert alert-danger">"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Markup {
    Loading,
    Error(String),
    Results(String),
}

fn highlight_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<span class="text-primary">(.*?)</span>"#).expect("static pattern")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("static pattern"))
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Turns output-region markup into terminal text: highlighted pairs are
/// coloured when `colorize` is set, every other tag is dropped.
pub fn to_terminal_text(html: &str, colorize: bool) -> String {
    let highlighted = highlight_pattern().replace_all(html, |caps: &Captures| {
        if colorize {
            caps[1].cyan().to_string()
        } else {
            caps[1].to_string()
        }
    });
    unescape_html(&tag_pattern().replace_all(&highlighted, ""))
}

pub fn classify(html: &str, colorize: bool) -> Markup {
    if html == LOADING_HTML {
        Markup::Loading
    } else if html.starts_with(ERROR_OPEN) {
        Markup::Error(to_terminal_text(html, false))
    } else {
        Markup::Results(to_terminal_text(html, colorize))
    }
}

/// Page hosted on a terminal. Form values come from the command line; the
/// output region is stdout, with the loading marker shown as a spinner and
/// errors written to stderr.
pub struct TerminalDom {
    fields: MemoryDom,
    colorize: bool,
    raw: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalDom {
    pub fn new(fields: MemoryDom, colorize: bool, raw: bool) -> Self {
        Self {
            fields,
            colorize,
            raw,
            spinner: Mutex::new(None),
        }
    }

    pub fn fields(&self) -> &MemoryDom {
        &self.fields
    }

    fn stop_spinner(&self) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn start_spinner(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(":: {spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Loading...");
        pb.enable_steady_tick(Duration::from_millis(100));
        let mut spinner = self.spinner.lock().unwrap_or_else(|p| p.into_inner());
        *spinner = Some(pb);
    }
}

impl Dom for TerminalDom {
    fn value(&self, id: &str) -> Option<String> {
        self.fields.value(id)
    }

    fn set_html(&self, id: &str, html: &str) {
        self.fields.set_html(id, html);
        if id != RESULT_OUTPUT {
            return;
        }
        self.stop_spinner();
        if self.raw {
            println!("{html}");
            return;
        }
        match classify(html, self.colorize) {
            Markup::Loading => self.start_spinner(),
            Markup::Error(text) => eprintln!(
                "{}{}{} {}",
                "[".bold().white(),
                "ERR".bold().red(),
                "]".bold().white(),
                text.red()
            ),
            Markup::Results(text) => println!("{text}"),
        }
    }
}
