//! Input scripts
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! open country
//! key country down
//! key country enter
//! drop attachments ./scan.pdf ./photo.png
//! remove attachments 0
//! ```

use anyhow::{Context, Result};
use formkit_platform::Key;
use std::path::PathBuf;

/// A parsed script line
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 1-based line number in the script
    pub line: usize,
    /// Field the command targets
    pub field: String,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Open,
    Key(Key),
    Click(usize),
    Hover(usize),
    Outside,
    Blur,
    Drop(Vec<PathBuf>),
    Pick(Vec<PathBuf>),
    Remove(usize),
    Disable,
    Enable,
}

/// Parse a whole script
pub fn parse(script: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let step = parse_line(line, text).with_context(|| format!("line {}: `{}`", line, text))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: usize, text: &str) -> Result<Step> {
    let mut words = text.split_whitespace();
    let command = words.next().unwrap_or_default();
    let Some(field) = words.next() else {
        anyhow::bail!("`{}` needs a field name", command);
    };
    let args: Vec<&str> = words.collect();

    let action = match command {
        "open" => no_args(command, &args, Action::Open)?,
        "outside" => no_args(command, &args, Action::Outside)?,
        "blur" => no_args(command, &args, Action::Blur)?,
        "disable" => no_args(command, &args, Action::Disable)?,
        "enable" => no_args(command, &args, Action::Enable)?,
        "key" => {
            let [name] = args.as_slice() else {
                anyhow::bail!("`key` takes exactly one key name");
            };
            Action::Key(name.parse()?)
        }
        "click" => Action::Click(index_arg(command, &args)?),
        "hover" => Action::Hover(index_arg(command, &args)?),
        "remove" => Action::Remove(index_arg(command, &args)?),
        "drop" => Action::Drop(path_args(command, &args)?),
        "pick" => Action::Pick(path_args(command, &args)?),
        other => anyhow::bail!("Unknown command `{}`", other),
    };

    Ok(Step {
        line,
        field: field.to_string(),
        action,
    })
}

fn no_args(command: &str, args: &[&str], action: Action) -> Result<Action> {
    if !args.is_empty() {
        anyhow::bail!("`{}` takes no arguments", command);
    }
    Ok(action)
}

fn index_arg(command: &str, args: &[&str]) -> Result<usize> {
    let [index] = args else {
        anyhow::bail!("`{}` takes exactly one index", command);
    };
    index
        .parse()
        .with_context(|| format!("`{}` is not a valid index", index))
}

fn path_args(command: &str, args: &[&str]) -> Result<Vec<PathBuf>> {
    if args.is_empty() {
        anyhow::bail!("`{}` needs at least one path", command);
    }
    Ok(args.iter().map(PathBuf::from).collect())
}
