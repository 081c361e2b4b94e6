// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A processor transforms files as they flow through a [`super::FileList`]
//! pipeline (§4.2, design note §9). The original system dispatches on a
//! callback's declared arity at registration time; Rust has no equivalent
//! runtime reflection, so arity becomes an explicit tag here. Each variant
//! corresponds to one calling convention from the original design:
//!
//! - `Sync` — transforms one file in place, no I/O.
//! - `Async` — transforms one file, may await I/O, may drop or replace it.
//! - `WholeList` — sees (and can reorder, merge, or split) the entire batch.
//! - `Downstream` — a pre-built pipeline segment spliced in via `pipe`.
//! - `Factory` — builds a `Downstream` segment lazily from options, so the
//!   same processor definition can be parameterized per `pipe()` call.

use crate::entities::file::File;
use crate::entities::file_list::FileList;
use crate::error::BuildError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single file transform with no awaiting. Returning `Ok(None)` drops the
/// file from the list (the mirror of the original's "return false/undefined
/// to remove").
pub trait SyncProcessor: Send + Sync {
    fn process(&self, file: File) -> Result<Option<File>, BuildError>;
}

/// A single file transform that may perform I/O.
#[async_trait]
pub trait AsyncProcessor: Send + Sync {
    async fn process(&self, file: File) -> Result<Option<File>, BuildError>;
}

/// A transform over the whole in-flight batch at once — the only processor
/// shape that can see cross-file relationships (concatenation, sorting,
/// deduplication).
#[async_trait]
pub trait WholeListProcessor: Send + Sync {
    async fn process(&self, files: Vec<File>) -> Result<Vec<File>, BuildError>;
}

/// Options passed to a [`Processor::Factory`] at `pipe()` call time,
/// analogous to the original's "options object" argument.
#[derive(Debug, Clone, Default)]
pub struct ProcessorOptions(pub HashMap<String, String>);

impl ProcessorOptions {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[derive(Clone)]
pub enum Processor {
    Sync(Arc<dyn SyncProcessor>),
    Async(Arc<dyn AsyncProcessor>),
    WholeList(Arc<dyn WholeListProcessor>),
    Downstream(Arc<FileList>),
    Factory(Arc<dyn Fn(ProcessorOptions) -> FileList + Send + Sync>),
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Processor::Sync(_) => "Sync",
            Processor::Async(_) => "Async",
            Processor::WholeList(_) => "WholeList",
            Processor::Downstream(_) => "Downstream",
            Processor::Factory(_) => "Factory",
        };
        write!(f, "Processor::{kind}")
    }
}

impl Processor {
    pub fn sync<P: SyncProcessor + 'static>(p: P) -> Self {
        Processor::Sync(Arc::new(p))
    }

    pub fn asynchronous<P: AsyncProcessor + 'static>(p: P) -> Self {
        Processor::Async(Arc::new(p))
    }

    pub fn whole_list<P: WholeListProcessor + 'static>(p: P) -> Self {
        Processor::WholeList(Arc::new(p))
    }
}

/// Adapts a plain closure into a [`SyncProcessor`], mirroring how most
/// built-in processors are defined in practice (single function, no state).
pub struct FnProcessor<F>(pub F);

impl<F> SyncProcessor for FnProcessor<F>
where
    F: Fn(File) -> Result<Option<File>, BuildError> + Send + Sync,
{
    fn process(&self, file: File) -> Result<Option<File>, BuildError> {
        (self.0)(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::encoding::Encoding;

    struct UppercaseBody;
    impl SyncProcessor for UppercaseBody {
        fn process(&self, mut file: File) -> Result<Option<File>, BuildError> {
            let text = file.content_as_text(Encoding::Utf8);
            file.set_content_text(text.to_uppercase());
            Ok(Some(file))
        }
    }

    #[test]
    fn sync_processor_transforms_file() {
        let processor = Processor::sync(UppercaseBody);
        let Processor::Sync(p) = processor else { panic!("expected Sync") };
        let file = File::from_text("a.txt", "hi");
        let out = p.process(file).unwrap().unwrap();
        assert_eq!(out.content_as_text(Encoding::Utf8), "HI");
    }

    #[test]
    fn fn_processor_can_drop_file() {
        let processor = FnProcessor(|_file: File| Ok(None));
        assert!(processor.process(File::from_text("a.txt", "x")).unwrap().is_none());
    }
}
