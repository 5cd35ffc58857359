//! Line-based interactive shell over a [`Session`].
//!
//! Each line is `<command> [args]`. Errors from the engine are shown to the
//! user and the loop carries on; only I/O failures end the shell.

use anyhow::Result;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use super::month_arg;
use crate::db::Database;
use crate::error::LedgerError;
use crate::models::EXPENSE_CATEGORIES;
use crate::session::Session;
use crate::ui::render;
use crate::ui::util::format_amount;

pub(crate) struct Shell {
    pub(crate) session: Session<Database>,
    pub(crate) running: bool,
    output: Vec<String>,
}

impl Shell {
    pub(crate) fn new(session: Session<Database>) -> Self {
        Self {
            session,
            running: true,
            output: Vec::new(),
        }
    }

    fn say(&mut self, msg: impl Into<String>) {
        self.output.push(msg.into());
    }

    pub(crate) fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn prompt(&self) -> String {
        format!("{}> ", self.session.cursor().label())
    }
}

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut Shell) -> Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("n", "Go to next month", cmd_next, r);
    register_command!("next", "Go to next month", cmd_next, r);
    register_command!("p", "Go to previous month", cmd_prev, r);
    register_command!("prev", "Go to previous month", cmd_prev, r);
    register_command!("today", "Go to the current month", cmd_today, r);
    register_command!("next-year", "Go forward one year", cmd_next_year, r);
    register_command!("prev-year", "Go back one year", cmd_prev_year, r);
    register_command!("m", "Go to month (e.g. m 2024-01)", cmd_month, r);
    register_command!("month", "Go to month (e.g. month 2024-01)", cmd_month, r);
    register_command!(
        "income",
        "Show or set this month's income (e.g. income 50000)",
        cmd_income,
        r
    );
    register_command!(
        "add",
        "Add expense (e.g. add Coffee with Sam 120 Food)",
        cmd_add,
        r
    );
    register_command!("delete", "Delete transaction by id (e.g. delete 12)", cmd_delete, r);
    register_command!(
        "filter",
        "Toggle a category filter on the list (e.g. filter Food)",
        cmd_filter,
        r
    );
    register_command!("clear-filters", "Remove all category filters", cmd_clear_filters, r);
    register_command!("s", "Show month summary", cmd_summary, r);
    register_command!("summary", "Show month summary", cmd_summary, r);
    register_command!("l", "List this month's transactions", cmd_list, r);
    register_command!("list", "List this month's transactions", cmd_list, r);
    register_command!("b", "Spending by category", cmd_breakdown, r);
    register_command!("breakdown", "Spending by category", cmd_breakdown, r);
    register_command!("categories", "List expense categories", cmd_categories, r);
    register_command!("reload", "Reload transactions from the database", cmd_reload, r);

    r
});

pub(crate) fn as_shell(session: Session<Database>) -> Result<()> {
    let mut shell = Shell::new(session);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    cmd_summary("", &mut shell)?;
    shell.say("Type 'help' for commands.");

    let mut lines = stdin.lock().lines();
    while shell.running {
        for line in shell.take_output() {
            writeln!(stdout, "{line}")?;
        }
        write!(stdout, "{}", shell.prompt())?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            writeln!(stdout)?;
            break;
        };
        handle_command(&line?, &mut shell);
    }

    shell.session.dispose();
    Ok(())
}

/// Run one input line. Failures become messages; the shell keeps going.
pub(crate) fn handle_command(input: &str, shell: &mut Shell) {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return;
    }
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    let Some(cmd) = COMMANDS.get(cmd_name) else {
        let suggestion = find_closest(cmd_name);
        shell.say(format!("Unknown command: {cmd_name}. Did you mean {suggestion}?"));
        return;
    };

    if let Err(err) = (cmd.run)(args, shell) {
        let msg = match err.downcast_ref::<LedgerError>() {
            Some(ledger_err) => {
                tracing::debug!("{cmd_name} failed: {ledger_err}");
                ledger_err.user_message()
            }
            None => err.to_string(),
        };
        shell.say(format!("Error: {msg}"));
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.running = false;
    Ok(())
}

fn cmd_help(_args: &str, shell: &mut Shell) -> Result<()> {
    let mut names: Vec<(&&str, &Command)> = COMMANDS.iter().filter(|(k, _)| k.len() > 1).collect();
    names.sort_by_key(|(k, _)| **k);
    for (name, cmd) in names {
        shell.say(format!("  {name:<14} {}", cmd.description));
    }
    Ok(())
}

fn show_month(shell: &mut Shell) -> Result<()> {
    cmd_summary("", shell)
}

fn cmd_next(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.session.next_month();
    show_month(shell)
}

fn cmd_prev(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.session.previous_month();
    show_month(shell)
}

fn cmd_today(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.session.select_current_month();
    show_month(shell)
}

fn cmd_next_year(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.session.next_year();
    show_month(shell)
}

fn cmd_prev_year(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.session.previous_year();
    show_month(shell)
}

fn cmd_month(args: &str, shell: &mut Shell) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: month YYYY-MM");
    }
    let (year, month) = month_arg(args)?;
    shell.session.jump_to_month(year, month)?;
    show_month(shell)
}

fn cmd_income(args: &str, shell: &mut Shell) -> Result<()> {
    let label = shell.session.cursor().label();
    if args.is_empty() {
        let current = shell.session.existing_income();
        shell.say(format!("Income for {label}: {}", format_amount(current)));
        return Ok(());
    }
    shell.session.set_monthly_income(args)?;
    let income = shell.session.total_income();
    shell.say(format!("Income for {label} set to {}", format_amount(income)));
    Ok(())
}

/// Split `<title words...> <amount> <category>`.
fn parse_expense_args(args: &str) -> Option<(String, &str, &str)> {
    let mut words: Vec<&str> = args.split_whitespace().collect();
    let category = words.pop()?;
    let amount = words.pop()?;
    if words.is_empty() {
        return None;
    }
    Some((words.join(" "), amount, category))
}

fn cmd_add(args: &str, shell: &mut Shell) -> Result<()> {
    let Some((title, amount, category)) = parse_expense_args(args) else {
        anyhow::bail!("Usage: add <title> <amount> <category>");
    };
    shell.session.add_expense(&title, amount, category)?;
    let remaining = shell.session.safe_to_spend().remaining;
    let budget = shell.session.budget();
    shell.say(format!(
        "Added {title}. Safe to spend: {} of {}",
        format_amount(remaining),
        format_amount(budget)
    ));
    Ok(())
}

fn cmd_delete(args: &str, shell: &mut Shell) -> Result<()> {
    let id: i64 = args
        .parse()
        .map_err(|_| anyhow::anyhow!("Usage: delete <id>"))?;
    if shell.session.delete_transaction(id)? {
        shell.say(format!("Deleted transaction {id}"));
    } else {
        shell.say(format!("No transaction with id {id}"));
    }
    Ok(())
}

fn cmd_filter(args: &str, shell: &mut Shell) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: filter <category>");
    }
    let category = crate::models::category::canonical(args);
    if shell.session.toggle_filter(&category) {
        shell.say(format!("Showing {category}"));
    } else {
        shell.say(format!("No longer filtering by {category}"));
    }
    cmd_list("", shell)
}

fn cmd_clear_filters(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.session.clear_filters();
    shell.say("Filters cleared");
    Ok(())
}

fn cmd_summary(_args: &str, shell: &mut Shell) -> Result<()> {
    let text = render::summary(shell.session.cursor(), &shell.session.summary());
    shell.say(text);
    Ok(())
}

fn cmd_list(_args: &str, shell: &mut Shell) -> Result<()> {
    let text = render::transactions(
        &shell.session.recent_transactions(),
        shell.session.active_filters(),
    );
    shell.say(text);
    Ok(())
}

fn cmd_breakdown(_args: &str, shell: &mut Shell) -> Result<()> {
    let text = render::breakdown(&shell.session.category_breakdown());
    shell.say(text);
    Ok(())
}

fn cmd_categories(_args: &str, shell: &mut Shell) -> Result<()> {
    shell.say(render::categories(EXPENSE_CATEGORIES));
    Ok(())
}

fn cmd_reload(_args: &str, shell: &mut Shell) -> Result<()> {
    let count = shell.session.load_all()?.len();
    shell.say(format!("Loaded {count} transactions"));
    Ok(())
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
