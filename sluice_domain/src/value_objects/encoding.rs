// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Text/binary duality for [`crate::entities::File`] content.
//!
//! Sluice only needs to move text content in and out of UTF-8 bytes; this
//! is deliberately not a full character-set conversion layer (that belongs
//! to a dedicated encoding crate, out of scope per spec.md §1).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    Utf8,
    /// Bytes are treated as opaque; `decode` is lossy (`from_utf8_lossy`).
    Binary,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Utf8
    }
}

impl Encoding {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Binary => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }
}
