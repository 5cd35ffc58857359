use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{month_arg, take_flag};
use crate::config::shellexpand;
use crate::db::TransactionStore;
use crate::error::LedgerError;
use crate::models::EXPENSE_CATEGORIES;
use crate::session::Session;
use crate::ui::{render, util::format_amount};

pub(crate) fn as_cli<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    dispatch(args, session).map_err(user_facing)
}

/// Engine errors carry store internals; show users the generic message instead.
fn user_facing(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<LedgerError>() {
        Some(ledger_err) => {
            tracing::debug!("command failed: {ledger_err}");
            anyhow::anyhow!(ledger_err.user_message())
        }
        None => err,
    }
}

fn dispatch<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];
    match command.as_str() {
        "summary" | "s" => cli_summary(rest, session),
        "list" | "l" => cli_list(rest, session),
        "breakdown" | "b" => cli_breakdown(rest, session),
        "income" | "i" => cli_income(rest, session),
        "add" | "a" => cli_add(rest, session),
        "delete" | "d" => cli_delete(rest, session),
        "export" => cli_export(rest, session),
        "categories" => {
            println!("{}", render::categories(EXPENSE_CATEGORIES));
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("pocketledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("PocketLedger - monthly income, expenses and what is safe to spend");
    println!();
    println!("Usage: pocketledger [--db <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Start the interactive shell");
    println!("  summary [YYYY-MM]               Income, expenses and safe-to-spend for a month");
    println!("  list [YYYY-MM]                  List a month's transactions, newest first");
    println!("    --category <name>             Only show this category (repeatable)");
    println!("  breakdown [YYYY-MM]             Spending by category");
    println!("  income <amount>                 Set the month's income (replaces existing)");
    println!("  add <title> <amount> <category> Record an expense");
    println!("  delete <id>                     Delete a transaction");
    println!("  export [path]                   Export a month's transactions to CSV");
    println!("  categories                      List expense categories");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("income, add and export accept --month <YYYY-MM> (default: current month).");
    println!("The database path can also be set with POCKETLEDGER_DB.");
}

/// Point the session at `raw` when given. The current month is kept otherwise.
fn select_month<S: TransactionStore>(raw: Option<&String>, session: &mut Session<S>) -> Result<()> {
    if let Some(raw) = raw {
        let (year, month) = month_arg(raw)?;
        session.jump_to_month(year, month)?;
    }
    Ok(())
}

/// `[YYYY-MM]` as the first positional argument.
fn positional_month<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    select_month(args.iter().find(|a| !a.starts_with('-')), session)
}

/// `--month YYYY-MM`, returning the other arguments.
fn flag_month<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<Vec<String>> {
    let (months, rest) = take_flag(args, "--month")?;
    select_month(months.last(), session)?;
    Ok(rest)
}

pub(crate) fn cli_summary<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    positional_month(args, session)?;
    println!("{}", render::summary(session.cursor(), &session.summary()));
    Ok(())
}

pub(crate) fn cli_list<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    let (categories, rest) = take_flag(args, "--category")?;
    positional_month(&rest, session)?;
    for category in &categories {
        session.add_filter(&crate::models::category::canonical(category));
    }
    println!("{}", session.cursor().label());
    println!(
        "{}",
        render::transactions(&session.recent_transactions(), session.active_filters())
    );
    Ok(())
}

pub(crate) fn cli_breakdown<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    positional_month(args, session)?;
    println!("{}", session.cursor().label());
    println!("{}", render::breakdown(&session.category_breakdown()));
    Ok(())
}

pub(crate) fn cli_income<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    let rest = flag_month(args, session)?;
    let Some(amount) = rest.first() else {
        anyhow::bail!("Usage: pocketledger income <amount> [--month YYYY-MM]");
    };
    session.set_monthly_income(amount)?;
    println!(
        "Income for {} set to {}",
        session.cursor().label(),
        format_amount(session.total_income())
    );
    Ok(())
}

pub(crate) fn cli_add<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    let rest = flag_month(args, session)?;
    let [title, amount, category] = rest.as_slice() else {
        anyhow::bail!("Usage: pocketledger add <title> <amount> <category> [--month YYYY-MM]");
    };
    session.add_expense(title, amount, category)?;
    println!(
        "Added {title}. Safe to spend in {}: {}",
        session.cursor().label(),
        format_amount(session.safe_to_spend().remaining)
    );
    Ok(())
}

pub(crate) fn cli_delete<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: pocketledger delete <id>"))?;
    let id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid transaction id: {raw}"))?;
    if session.delete_transaction(id)? {
        println!("Deleted transaction {id}");
    } else {
        println!("No transaction with id {id}");
    }
    Ok(())
}

pub(crate) fn cli_export<S: TransactionStore>(args: &[String], session: &mut Session<S>) -> Result<()> {
    let rest = flag_month(args, session)?;
    let path = rest
        .first()
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| default_export_path(&session.cursor().key()));

    let count = crate::export::export_to_path(&path, &session.month_transactions())?;
    if count == 0 {
        println!("No transactions for {}", session.cursor().label());
    } else {
        println!("Exported {count} transactions to {}", path.display());
    }
    Ok(())
}

pub(crate) fn default_export_path(month_key: &str) -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(format!("pocketledger-export-{month_key}.csv"))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
