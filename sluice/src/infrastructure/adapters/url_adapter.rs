// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! URL capability adapter: path-relative resolution plus `data:` URIs for
//! inline source maps, not general URL parsing. `sluice_domain` already
//! carries the implementation (`StdUrl`); this module re-exports it as
//! `UrlHelper`, the name the rest of the infrastructure layer expects.

pub use sluice_domain::services::url_port::StdUrl as UrlHelper;

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_domain::services::url_port::UrlPort;

    #[test]
    fn resolve_joins_relative_urls() {
        let url = UrlHelper;
        assert_eq!(url.resolve("src/a.js", "./b.js"), "src/b.js");
    }
}
