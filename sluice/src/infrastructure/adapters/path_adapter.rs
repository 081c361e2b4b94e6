// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Path capability adapter. Unlike the file-system and URL ports, path
//! manipulation here is pure and synchronous, so `sluice_domain` already
//! carries a full [`PathPort`] implementation; this module just re-exports
//! it under the name the infrastructure layer's other adapters live next to.

use sluice_domain::services::path_port::PathPort as _;

pub use sluice_domain::services::path_port::StdPath;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn resolve_joins_relative_paths_against_base() {
        let path = StdPath;
        assert_eq!(path.resolve(Path::new("/dist"), Path::new("a.txt")), Path::new("/dist/a.txt"));
    }
}
