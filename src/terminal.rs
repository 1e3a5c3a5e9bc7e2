//! Interactive prompts
//!
//! [`Terminal`] is the seam between the workflow and the operator. The real
//! implementation uses `inquire`; tests script the answers.

use std::fmt;
use std::time::Duration;

use inquire::{Confirm, InquireError, Select};

use crate::error::Result;
use crate::output;

pub trait Terminal {
    /// Present `items` as a single choice. `None` means the operator cancelled.
    fn choose(&self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// Ask a yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Block for a fixed delay
    fn pause(&self, duration: Duration);

    /// Tell the operator about something that will not stop the run
    fn warn(&self, message: &str);
}

/// Menu entry that remembers its position in the original list
struct MenuItem<'a> {
    index: usize,
    label: &'a str,
}

impl fmt::Display for MenuItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// [`Terminal`] on the real console
pub struct InquireTerminal;

impl Terminal for InquireTerminal {
    fn choose(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        let options: Vec<MenuItem<'_>> = items
            .iter()
            .enumerate()
            .map(|(index, label)| MenuItem { index, label })
            .collect();

        let answer = Select::new(prompt, options)
            .with_page_size(15)
            .with_help_message("↑↓ to move, type to filter, ENTER to select, ESC to cancel")
            .prompt_skippable();

        match answer {
            Ok(choice) => Ok(choice.map(|item| item.index)),
            Err(InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let answer = Confirm::new(prompt)
            .with_default(default)
            .with_help_message("Press Enter to accept, or 'n' to decline")
            .prompt_skippable();

        match answer {
            Ok(answer) => Ok(answer.unwrap_or(false)),
            Err(InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn warn(&self, message: &str) {
        output::warn(message);
    }
}
