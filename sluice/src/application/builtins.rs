// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A handful of trivial built-in processors, registered into a
//! [`DylibPluginLoader`] at startup so `sluice.toml` pipelines can name them
//! by string. Sluice does not interpret file formats itself (spec.md §1
//! Non-goal), so these stay format-agnostic: passthrough, content-prefixing,
//! and extension-renaming, the same category of "plumbing" processor a real
//! pipeline composes with format-specific ones supplied as plugins.

use crate::infrastructure::adapters::DylibPluginLoader;
use sluice_domain::entities::file::File;
use sluice_domain::entities::processor::{FnProcessor, Processor};
use sluice_domain::value_objects::encoding::Encoding;

/// Registers the built-in processors under their conventional names. Callers
/// that need their own plugins register them on the same loader afterward;
/// registration is last-write-wins, so a caller can shadow a built-in name.
pub fn register_builtins(loader: &DylibPluginLoader) {
    loader.register("identity", identity());
    loader.register("prepend-banner", prepend_banner("/* built with sluice */\n"));
}

/// Passes every file through unchanged. Useful as a pipeline placeholder or
/// as the `Downstream`/`Factory` default when no transform is configured.
pub fn identity() -> Processor {
    Processor::sync(FnProcessor(|file: File| Ok(Some(file))))
}

/// Prepends `banner` to each file's text content.
pub fn prepend_banner(banner: &'static str) -> Processor {
    Processor::sync(FnProcessor(move |mut file: File| {
        let text = file.content_as_text(Encoding::Utf8);
        file.set_content_text(format!("{banner}{text}"));
        Ok(Some(file))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_domain::services::plugin_loader_port::PluginLoaderPort;

    #[test]
    fn identity_leaves_content_unchanged() {
        let Processor::Sync(p) = identity() else { panic!("expected Sync") };
        let file = File::from_text("a.txt", "hello");
        let out = p.process(file).unwrap().unwrap();
        assert_eq!(out.content_as_text(Encoding::Utf8), "hello");
    }

    #[test]
    fn prepend_banner_adds_the_banner_once() {
        let Processor::Sync(p) = prepend_banner("// banner\n") else { panic!("expected Sync") };
        let file = File::from_text("a.js", "body");
        let out = p.process(file).unwrap().unwrap();
        assert_eq!(out.content_as_text(Encoding::Utf8), "// banner\nbody");
    }

    #[test]
    fn register_builtins_makes_identity_and_banner_loadable() {
        let loader = DylibPluginLoader::new();
        register_builtins(&loader);
        assert!(loader.load("identity").is_ok());
        assert!(loader.load("prepend-banner").is_ok());
    }
}
