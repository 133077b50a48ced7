/// `using` directive extraction.
///
/// A Vala `using` directive imports one or more namespaces for the whole
/// file: `using GLib;` or `using Gtk, Gee;`.  The builder hands every
/// top-level statement to [`parse_using`]; the names it returns are kept
/// on the parsed unit in source order and later form the per-request
/// using set.

/// Namespaces named by a `using` statement (without its trailing `;`), or
/// `None` when the statement is not a `using` directive.
pub(crate) fn parse_using(statement: &str) -> Option<Vec<String>> {
    let rest = statement.trim().strip_prefix("using")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let names: Vec<String> = rest
        .split(',')
        .map(str::trim)
        .filter(|name| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        })
        .map(str::to_string)
        .collect();
    Some(names)
}

/// Append `names` to `usings`, skipping duplicates.
pub(crate) fn merge_usings(usings: &mut Vec<String>, names: Vec<String>) {
    for name in names {
        if !usings.contains(&name) {
            usings.push(name);
        }
    }
}
