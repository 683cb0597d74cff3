//! Text rendering
//!
//! Writes a [`Payload`] back out as nginx-style configuration text.

use crate::directive::Directive;
use crate::payload::{ConfigFile, Payload};
use std::io::{self, Write};

const INDENT: &str = "    ";

/// Render every unit of the payload
///
/// When the payload holds more than one unit, each is preceded by a
/// `# <file>` header and units are separated by a blank line.
///
/// # Errors
/// Returns error if writing to `out` fails
pub fn render<W: Write + ?Sized>(payload: &Payload, out: &mut W) -> io::Result<()> {
    let headers = payload.config.len() > 1;
    for (i, file) in payload.config.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        if headers {
            writeln!(out, "# {}", file.file)?;
        }
        render_file(file, out)?;
    }
    Ok(())
}

/// Render a single unit
///
/// # Errors
/// Returns error if writing to `out` fails
pub fn render_file<W: Write + ?Sized>(file: &ConfigFile, out: &mut W) -> io::Result<()> {
    write_sequence(&file.parsed, 0, out)
}

/// Render a payload into a string
#[must_use]
pub fn render_to_string(payload: &Payload) -> String {
    let mut buf = Vec::new();
    // writing into a Vec can't fail
    let _ = render(payload, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_sequence<W: Write + ?Sized>(sequence: &[Directive], depth: usize, out: &mut W) -> io::Result<()> {
    for directive in sequence {
        write_directive(directive, depth, out)?;
    }
    Ok(())
}

fn write_directive<W: Write + ?Sized>(directive: &Directive, depth: usize, out: &mut W) -> io::Result<()> {
    let indent = INDENT.repeat(depth);

    if directive.is_comment() {
        return writeln!(out, "{indent}#{}", directive.comment.as_deref().unwrap_or_default());
    }

    write!(out, "{indent}{}", directive.directive)?;
    for arg in &directive.args {
        write!(out, " {}", quote(arg))?;
    }

    match &directive.block {
        None => writeln!(out, ";"),
        Some(children) if children.is_empty() => writeln!(out, " {{}}"),
        Some(children) => {
            writeln!(out, " {{")?;
            write_sequence(children, depth + 1, out)?;
            writeln!(out, "{indent}}}")
        }
    }
}

/// Quote an argument when nginx would otherwise split or misread it
fn quote(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '{' | '}' | '"' | '\'' | '#'));
    if !needs_quotes {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
