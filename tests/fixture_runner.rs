//! Data-driven completion tests.
//!
//! Every `tests/fixtures/*.fixture` file holds directives followed by one
//! or more Vala units:
//!
//! ```text
//! // expect: RED, GREEN
//! // expect-not: Color
//! --- lib.vala
//! enum Color { RED, GREEN }
//! --- main.vala
//! void main () {
//!     Color.<|>
//! }
//! ```
//!
//! Directives:
//! - `expect: a, b`: every name is offered
//! - `expect-not: a, b`: no name is offered
//! - `expect-exact: a, b`: exactly these names, in this order
//! - `expect-empty:`: nothing is offered
//!
//! Units whose name ends in `.vapi` are loaded as external declarations.
//! The unit containing the `<|>` marker is the one completed.
mod common;

use datatest_stable::Utf8Path;

use common::{display_texts, request_at, split_cursor};
use valhalla_lsp::Backend;

#[derive(Debug, Default)]
struct Fixture {
    expect: Vec<String>,
    expect_not: Vec<String>,
    expect_exact: Option<Vec<String>>,
    expect_empty: bool,
    units: Vec<(String, String)>,
}

fn names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_fixture(content: &str) -> datatest_stable::Result<Fixture> {
    let mut fixture = Fixture::default();
    let mut current: Option<(String, String)> = None;

    for line in content.lines() {
        if let Some(name) = line.strip_prefix("--- ") {
            if let Some(unit) = current.take() {
                fixture.units.push(unit);
            }
            current = Some((name.trim().to_string(), String::new()));
            continue;
        }
        if let Some((_, text)) = current.as_mut() {
            text.push_str(line);
            text.push('\n');
            continue;
        }

        let Some(directive) = line.strip_prefix("// ") else {
            continue;
        };
        if let Some(rest) = directive.strip_prefix("expect-not:") {
            fixture.expect_not.extend(names(rest));
        } else if let Some(rest) = directive.strip_prefix("expect-exact:") {
            fixture.expect_exact = Some(names(rest));
        } else if directive.starts_with("expect-empty:") {
            fixture.expect_empty = true;
        } else if let Some(rest) = directive.strip_prefix("expect:") {
            fixture.expect.extend(names(rest));
        } else {
            return Err(format!("unknown directive: {}", line).into());
        }
    }
    if let Some(unit) = current.take() {
        fixture.units.push(unit);
    }

    if fixture.units.is_empty() {
        return Err("fixture has no units".into());
    }
    Ok(fixture)
}

fn run_fixture(path: &Utf8Path, content: String) -> datatest_stable::Result<()> {
    let fixture = parse_fixture(&content)?;
    let backend = Backend::new_test();

    let mut target = None;
    for (name, text) in &fixture.units {
        if text.contains(common::CURSOR) {
            let (clean, _) = split_cursor(text);
            backend.update_unit(name, &clean);
            target = Some((name.as_str(), text.as_str()));
        } else if name.ends_with(".vapi") {
            backend.update_external_unit(name, text);
        } else {
            backend.update_unit(name, text);
        }
    }
    let (unit, source) = target.ok_or_else(|| format!("{}: no <|> marker", path))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let candidates = runtime.block_on(backend.complete(request_at(unit, source)));
    let offered = display_texts(&candidates);

    for name in &fixture.expect {
        if !offered.contains(&name.as_str()) {
            return Err(format!("{}: expected {} in {:?}", path, name, offered).into());
        }
    }
    for name in &fixture.expect_not {
        if offered.contains(&name.as_str()) {
            return Err(format!("{}: did not expect {} in {:?}", path, name, offered).into());
        }
    }
    if let Some(exact) = &fixture.expect_exact
        && offered != exact.iter().map(String::as_str).collect::<Vec<_>>()
    {
        return Err(format!("{}: expected exactly {:?}, got {:?}", path, exact, offered).into());
    }
    if fixture.expect_empty && !offered.is_empty() {
        return Err(format!("{}: expected no candidates, got {:?}", path, offered).into());
    }
    Ok(())
}

datatest_stable::harness! {
    { test = run_fixture, root = "tests/fixtures", pattern = r"\.fixture$" },
}
