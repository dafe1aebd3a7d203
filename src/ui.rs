//! User Interface
//!
//! The presentation seam consumed by the core: categorized output, free-text
//! prompts, and yes/no confirmation. The core never writes raw bytes itself;
//! everything user-visible goes through this trait. [`ConsoleUi`] is the
//! terminal implementation.

use std::io::{self, BufRead, Write};

use owo_colors::OwoColorize;

/// Categorized presentation operations
pub trait UserInterface {
    /// Whether debug output is currently shown
    fn debug_enabled(&self) -> bool;

    /// Turn debug output on or off
    fn set_debug(&mut self, enabled: bool);

    /// Ask the user for a line of free text
    fn prompt(&mut self, message: &str) -> String;

    /// Ask the user a yes/no question
    fn confirm(&mut self, message: &str) -> bool;

    /// Assistant status and guidance text
    fn write_system(&mut self, message: &str);

    /// Model chat responses
    fn write_chat(&mut self, message: &str);

    /// A proposed shell command
    fn write_command(&mut self, message: &str);

    /// Output produced by an executed command
    fn write_command_output(&mut self, message: &str);

    /// Error text produced by an executed command
    fn write_command_error(&mut self, message: &str);

    /// Internal failures (distinct from command errors)
    fn write_error(&mut self, message: &str);

    /// Diagnostic output, shown only when debug is enabled
    fn write_debug(&mut self, message: &str);
}

/// Whether a confirmation reply counts as "yes"
pub(crate) fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().chars().next(), Some('y') | Some('Y'))
}

/// Terminal implementation of [`UserInterface`]
#[derive(Debug, Default)]
pub struct ConsoleUi {
    debug: bool,
}

impl ConsoleUi {
    /// Create a console UI with the given initial debug state
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn read_line(&self) -> String {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return String::new();
        }
        line.trim_end_matches(['\r', '\n']).to_string()
    }
}

impl UserInterface for ConsoleUi {
    fn debug_enabled(&self) -> bool {
        self.debug
    }

    fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    fn prompt(&mut self, message: &str) -> String {
        self.write_system(message);
        self.read_line()
    }

    fn confirm(&mut self, message: &str) -> bool {
        print!("{} ", format!("{} Y/N:", message).white());
        let _ = io::stdout().flush();
        is_affirmative(&self.read_line())
    }

    fn write_system(&mut self, message: &str) {
        println!("{}", message.white());
    }

    fn write_chat(&mut self, message: &str) {
        println!("{}", message);
    }

    fn write_command(&mut self, message: &str) {
        println!("{}", message.green());
    }

    fn write_command_output(&mut self, message: &str) {
        println!("{}", message.yellow());
    }

    fn write_command_error(&mut self, message: &str) {
        println!("{}", message.red());
    }

    fn write_error(&mut self, message: &str) {
        eprintln!("{}", message.red());
    }

    fn write_debug(&mut self, message: &str) {
        if self.debug {
            println!("{}", message.bright_black());
        }
    }
}
