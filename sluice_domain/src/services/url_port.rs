// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! URL capability (§6): resolving `File::resolve`/`File::relative`, and
//! building `data:` URIs for inline source maps.

use base64::Engine as _;

pub trait UrlPort: Send + Sync {
    fn resolve(&self, base: &str, url: &str) -> String;
    fn relative(&self, from: &str, to: &str) -> String;
    fn base64_uri(&self, mime: &str, payload: &[u8]) -> String;
}

#[derive(Default, Clone, Copy)]
pub struct StdUrl;

impl UrlPort for StdUrl {
    fn resolve(&self, base: &str, url: &str) -> String {
        let (path, query_fragment) = split_query_fragment(url);
        if path.starts_with('/') || path.contains("://") {
            return url.to_string();
        }
        let base_dir = base.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let joined = if base_dir.is_empty() {
            path.to_string()
        } else {
            format!("{base_dir}/{path}")
        };
        format!("{}{}", normalize(&joined), query_fragment)
    }

    fn relative(&self, from: &str, to: &str) -> String {
        let (to_path, to_qf) = split_query_fragment(to);
        let from_dir: Vec<&str> = from.rsplit_once('/').map(|(d, _)| d).unwrap_or("").split('/').collect();
        let to_parts: Vec<&str> = to_path.split('/').collect();
        let common = from_dir.iter().zip(to_parts.iter()).take_while(|(a, b)| a == b).count();
        let mut out = Vec::new();
        for _ in common..from_dir.len() {
            out.push("..".to_string());
        }
        out.extend(to_parts[common..].iter().map(|s| s.to_string()));
        format!("{}{}", out.join("/"), to_qf)
    }

    fn base64_uri(&self, mime: &str, payload: &[u8]) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload);
        format!("data:{mime};base64,{encoded}")
    }
}

fn split_query_fragment(url: &str) -> (&str, String) {
    let cut = url.find(['?', '#']).unwrap_or(url.len());
    (&url[..cut], url[cut..].to_string())
}

fn normalize(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_keeps_query_and_fragment() {
        let url = StdUrl;
        assert_eq!(url.resolve("src/a.js", "b.js?v=1#frag"), "src/b.js?v=1#frag");
    }

    #[test]
    fn base64_uri_roundtrips() {
        let url = StdUrl;
        let uri = url.base64_uri("application/json", b"{}");
        assert!(uri.starts_with("data:application/json;base64,"));
    }
}
