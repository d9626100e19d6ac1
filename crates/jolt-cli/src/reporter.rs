//! Terminal rendering of diagnostics.

use colored::Colorize;

use jolt_common::diagnostics::{Msg, MsgKind};

/// Render one diagnostic the way the host shows it: a colored severity
/// tag, the location, the message, then the source line with a caret.
pub fn format_msg(msg: &Msg) -> String {
    let mut out = String::new();
    let tag = match msg.kind {
        MsgKind::Error => "error".red().bold().to_string(),
        MsgKind::Warning => "warning".yellow().bold().to_string(),
        MsgKind::Info => "info".cyan().to_string(),
        MsgKind::Debug => "debug".dimmed().to_string(),
    };

    match &msg.data.location {
        Some(loc) => {
            out.push_str(&format!(
                "{}: {}: {}\n",
                format!("{}:{}:{}", loc.file, loc.line, loc.column).bold(),
                tag,
                msg.data.text
            ));
            out.push_str(&format!("  {}\n", loc.line_text));
            let caret_pad = " ".repeat(loc.column as usize + 2);
            let caret = "^".repeat((loc.length.max(1)) as usize);
            out.push_str(&format!("{caret_pad}{}\n", caret.green()));
        }
        None => {
            out.push_str(&format!("{}: {}\n", tag, msg.data.text));
        }
    }

    for note in &msg.notes {
        match &note.location {
            Some(loc) => out.push_str(&format!(
                "    {} {}:{}:{}: {}\n",
                "note:".dimmed(),
                loc.file,
                loc.line,
                loc.column,
                note.text
            )),
            None => out.push_str(&format!("    {} {}\n", "note:".dimmed(), note.text)),
        }
    }
    out
}
