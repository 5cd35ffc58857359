mod cli;
mod shell;

pub(crate) use cli::as_cli;
pub(crate) use shell::as_shell;

/// Split `--flag value` pairs out of `args`, returning every value given for
/// the flag and the remaining arguments in order.
pub(crate) fn take_flag(args: &[String], flag: &str) -> anyhow::Result<(Vec<String>, Vec<String>)> {
    let mut values = Vec::new();
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            let value = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))?;
            values.push(value.clone());
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((values, rest))
}

/// Parse a `YYYY-MM` argument, with a usage hint on failure.
pub(crate) fn month_arg(raw: &str) -> anyhow::Result<(i32, u32)> {
    crate::ledger::parse_month_key(raw)
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{raw}': expected YYYY-MM"))
}
