// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Process Plugin Registry
//!
//! Sluice makes no attempt at sandboxed plugin execution, so "loading a
//! plugin" here means resolving a bare name against processors registered
//! at startup rather than `dlopen`-ing a shared object (see DESIGN.md for
//! this Open Question's resolution). A real out-of-process plugin loader
//! would sit behind the same [`PluginLoaderPort`] trait without the
//! pipeline noticing the difference.

use sluice_domain::entities::processor::Processor;
use sluice_domain::error::BuildError;
use sluice_domain::services::plugin_loader_port::PluginLoaderPort;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct DylibPluginLoader {
    registry: RwLock<HashMap<String, Processor>>,
}

impl DylibPluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `processor` under `name`, overwriting any prior
    /// registration of the same name.
    pub fn register(&self, name: impl Into<String>, processor: Processor) {
        self.registry.write().unwrap().insert(name.into(), processor);
    }
}

impl PluginLoaderPort for DylibPluginLoader {
    fn load(&self, name: &str) -> Result<Processor, BuildError> {
        self.registry
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::PluginError(format!("no processor registered under {name:?}")))
    }
}
