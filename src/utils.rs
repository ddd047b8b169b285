use std::fmt::Formatter;

/// Write `e` followed by every underlying cause. Used for `Debug` impls of
/// error enums, so that logs show the whole chain.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// `e` and its causes on one line, separated by `: `. Suitable for showing to
/// a user, where `error_chain_fmt` is meant for logs.
pub fn error_chain_message(e: &impl std::error::Error) -> String {
    let mut message = e.to_string();
    let mut current = e.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
