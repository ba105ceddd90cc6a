//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the ODS demo agent.

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Longest tool argument / result preview printed in a transcript.
const PREVIEW_CHARS: usize = 160;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the ODS banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                r#"
   {}
   {}
   {}
   {}
"#,
                "  ___  ____  ____  ".bright_cyan().bold(),
                " / _ \\|  _ \\/ ___| ".cyan().bold(),
                "| (_) | |_) \\___ \\ ".blue().bold(),
                " \\___/|____/|____/ ".blue().bold(),
            );
            println!(
                "   {} {}\n",
                "Open Deep Search".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!(
                r#"
  ___  ____  ____
 / _ \|  _ \/ ___|
| (_) | |_) \___ \
 \___/|____/|____/

   Open Deep Search v{}
"#,
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print one tool invocation from the agent transcript
    pub fn tool_call(&self, name: &str, arguments: &str, result: &str) {
        let arguments = preview(arguments);
        let result = preview(result);
        if self.colored {
            println!(
                "  {} {}{}",
                "⚙".magenta().bold(),
                name.bright_magenta(),
                format!("({})", arguments).dimmed()
            );
            println!("    {} {}", "→".dimmed(), result.dimmed());
        } else {
            println!("  [TOOL] {}({})", name, arguments);
            println!("    -> {}", result);
        }
    }

    /// Print the agent's final answer
    pub fn answer(&self, text: &str) {
        if self.colored {
            println!("\n{}\n", text.bright_white());
        } else {
            println!("\n{}\n", text);
        }
    }

    /// Print the input prompt without a trailing newline
    pub fn prompt(&self) {
        if self.colored {
            print!("{} ", "ods>".bright_cyan().bold());
        } else {
            print!("ods> ");
        }
        io::stdout().flush().ok();
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

/// Single-line preview, cut at [`PREVIEW_CHARS`] characters.
pub fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    }
}
