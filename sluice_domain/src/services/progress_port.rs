// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Logging / progress capability (§6): `log`/`error`/`format` plus
//! `begin`/`end` for progress bars, keyed the same way as the task barrier
//! so a progress span can track "how many stages are still running".

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

pub trait ProgressPort: Send + Sync {
    fn log(&self, data: &str, level: LogLevel);
    fn error(&self, data: &str);
    fn begin(&self, label: &str, args: &HashMap<String, String>) -> u64;
    fn end(&self, id: u64);
}

/// `{name}`-placeholder template substitution, per §6.
pub fn format_template(template: &str, args: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' {
            let mut name = String::new();
            let mut closed = false;
            for c2 in chars.by_ref() {
                if c2 == '}' {
                    closed = true;
                    break;
                }
                name.push(c2);
            }
            if closed {
                if let Some(value) = args.get(&name) {
                    out.push_str(value);
                } else {
                    out.push('{');
                    out.push_str(&name);
                    out.push('}');
                }
            } else {
                out.push('{');
                out.push_str(&name);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_placeholders_and_leaves_unknown() {
        let mut args = HashMap::new();
        args.insert("name".to_string(), "a.js".to_string());
        assert_eq!(format_template("building {name} ({missing})", &args), "building a.js ({missing})");
    }
}
