// UI layer: the terminal console and the interactive loop that builds one
// novel record per pass, asks for confirmation and hands it to the store.
// The console is a trait so the loop can be driven by a script in tests.

use crate::api::RecordStore;
use crate::error::PromptError;
use crate::novel::{
    cover_or_placeholder, is_yes, parse_count, parse_price, Category, NovelRecord, Pricing,
};
use console::style;
use dialoguer::Input;
use std::io::{BufRead, IsTerminal, Write};

/// Printed when the session ends through Ctrl-C or closed input.
pub const INTERRUPTED_FAREWELL: &str = "Exited. Goodbye!";

/// How a line of output should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Success,
    Warning,
    Failure,
}

/// Line-oriented terminal access used by [`RecordBuilder`].
pub trait Console {
    /// Show `prompt` and wait for one line. Every call is a point where the
    /// user may interrupt the session.
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;

    fn say(&mut self, tone: Tone, line: &str);
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        (**self).read_line(prompt)
    }

    fn say(&mut self, tone: Tone, line: &str) {
        (**self).say(tone, line)
    }
}

/// Print the interrupt farewell.
pub fn print_interrupted_farewell() {
    println!();
    println!();
    println!("{}", INTERRUPTED_FAREWELL);
}

/// Ctrl-C outside a dialoguer prompt (line reads, the upload itself) arrives
/// as SIGINT. Say goodbye and exit cleanly; nothing pending is submitted.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        print_interrupted_farewell();
        std::process::exit(0);
    })
}

/// dialoguer draws on stderr, so prompts need stdin and stderr on a tty.
/// Where stdout goes does not matter.
fn use_dialoguer(stdin_is_term: bool, stderr_is_term: bool) -> bool {
    stdin_is_term && stderr_is_term
}

/// Console backed by the real terminal. Uses `dialoguer` prompts when
/// attached to a tty and plain line reads when input is piped.
pub struct TerminalConsole {
    interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole {
            interactive: use_dialoguer(
                std::io::stdin().is_terminal(),
                console::Term::stderr().is_term(),
            ),
        }
    }
}

/// Show `prompt` on the same line the answer is typed on, then read one line.
/// A closed input stream ends the session the same way Ctrl-C does.
fn read_piped<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String, PromptError> {
    write!(out, "{}: ", prompt)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::Interrupted);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        if !self.interactive {
            return read_piped(&mut std::io::stdin().lock(), &mut std::io::stdout(), prompt);
        }
        // `interact_text` reports Ctrl-C as an `Interrupted` io error.
        let line = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(line)
    }

    fn say(&mut self, tone: Tone, line: &str) {
        match tone {
            Tone::Plain => println!("{}", line),
            Tone::Success => println!("{} {}", style("✓").green().bold(), line),
            Tone::Warning => println!("{} {}", style("!").yellow().bold(), line),
            Tone::Failure => println!("{} {}", style("✗").red().bold(), line),
        }
    }
}

/// Outcome counts for one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub submitted: usize,
    pub failed: usize,
    pub cancelled: usize,
}

/// Drives the collect, confirm, submit, continue cycle until the user stops.
pub struct RecordBuilder<C, S> {
    console: C,
    store: S,
}

impl<C: Console, S: RecordStore> RecordBuilder<C, S> {
    pub fn new(console: C, store: S) -> Self {
        RecordBuilder { console, store }
    }

    /// Run until the user declines to add another novel.
    ///
    /// Returns `Err(PromptError::Interrupted)` as soon as any prompt is
    /// interrupted; whatever was collected so far is dropped unsubmitted.
    pub fn run(&mut self) -> Result<SessionSummary, PromptError> {
        let mut summary = SessionSummary::default();
        loop {
            self.console.say(Tone::Plain, "");
            self.console.say(Tone::Plain, "Enter the novel details:");

            // An empty required field starts the pass over from the title.
            let Some(record) = self.collect()? else {
                continue;
            };

            self.console.say(Tone::Plain, "");
            self.console.say(Tone::Plain, "Please confirm the novel:");
            for line in record.summary_lines() {
                self.console.say(Tone::Plain, &line);
            }
            let confirm = self.console.read_line("Add this novel? (y/n)")?;
            if !is_yes(&confirm) {
                self.console.say(Tone::Failure, "Cancelled");
                summary.cancelled += 1;
                continue;
            }

            if self.submit(&record) {
                summary.submitted += 1;
            } else {
                summary.failed += 1;
            }

            let another = self.console.read_line("Add another novel? (y/n)")?;
            if !is_yes(&another) {
                break;
            }
        }
        Ok(summary)
    }

    /// Hand the record to the store and report the outcome. Never fails the
    /// session; returns whether a row was created.
    fn submit(&mut self, record: &NovelRecord) -> bool {
        tracing::info!(title = %record.title, category = %record.category, "submitting novel");
        match self.store.insert(record) {
            Ok(Some(created)) => {
                let id = created.display_id();
                tracing::info!(%id, "novel created");
                let title = created.title.as_deref().unwrap_or(&record.title);
                self.console
                    .say(Tone::Success, &format!("Added novel: {}", title));
                self.console.say(Tone::Plain, &format!("Novel ID: {}", id));
                true
            }
            Ok(None) => {
                tracing::warn!(title = %record.title, "insert returned no rows");
                self.console.say(Tone::Failure, "Failed to add novel");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "insert failed");
                self.console.say(Tone::Failure, &format!("Error: {}", err));
                false
            }
        }
    }

    /// Ask for every field in order. `Ok(None)` when a required field was
    /// left empty.
    fn collect(&mut self) -> Result<Option<NovelRecord>, PromptError> {
        let Some(title) = self.required("Title")? else {
            return Ok(None);
        };
        let Some(author) = self.required("Author")? else {
            return Ok(None);
        };
        let Some(description) = self.required("Description")? else {
            return Ok(None);
        };

        let category = self.select_category()?;
        let cover = cover_or_placeholder(&self.console.read_line("Cover image URL (Enter to skip)")?);
        let pricing = self.read_pricing()?;

        Ok(Some(NovelRecord::new(
            title,
            author,
            description,
            category,
            cover,
            pricing,
        )))
    }

    fn required(&mut self, field: &str) -> Result<Option<String>, PromptError> {
        let value = self.console.read_line(field)?.trim().to_string();
        if value.is_empty() {
            self.console
                .say(Tone::Failure, &format!("{} cannot be empty!", field));
            return Ok(None);
        }
        Ok(Some(value))
    }

    fn select_category(&mut self) -> Result<Category, PromptError> {
        self.console.say(Tone::Plain, "");
        self.console.say(Tone::Plain, "Available categories:");
        for (i, category) in Category::ALL.iter().enumerate() {
            self.console
                .say(Tone::Plain, &format!("  {}. {}", i + 1, category));
        }
        let choice = self.console.read_line("Choose a category (number)")?;
        let (category, fell_back) = Category::from_choice(&choice);
        if fell_back {
            tracing::debug!(input = %choice, "category choice not usable");
            self.console
                .say(Tone::Warning, "Invalid choice, using default category Fantasy");
        }
        Ok(category)
    }

    /// Chapter counts and price as one block: the first value that does not
    /// parse stops the block and all three take their defaults.
    fn read_pricing(&mut self) -> Result<Pricing, PromptError> {
        match self.try_read_pricing()? {
            Some(pricing) => Ok(pricing),
            None => {
                tracing::debug!("chapter block not parsable, using defaults");
                self.console
                    .say(Tone::Warning, "Invalid number, using defaults");
                Ok(Pricing::DEFAULT)
            }
        }
    }

    fn try_read_pricing(&mut self) -> Result<Option<Pricing>, PromptError> {
        let Some(total_chapters) = parse_count(&self.console.read_line("Total chapters")?) else {
            return Ok(None);
        };
        let Some(free_chapters) = parse_count(&self.console.read_line("Free chapters")?) else {
            return Ok(None);
        };
        let Some(price) = parse_price(&self.console.read_line("Price ($)")?) else {
            return Ok(None);
        };
        Ok(Some(Pricing {
            total_chapters,
            free_chapters,
            price,
        }))
    }
}
