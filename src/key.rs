//! Cache keys for compiled shader variants.
//!
//! Two processors whose keys match are guaranteed to compile to the same
//! shader, so the pipeline reuses one GPU pipeline for both. Keys capture
//! compiled shape only; values that travel through uniforms (kernel weights,
//! bounds) stay out of the key on purpose.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::processor::FragmentProcessor;

/// Accumulates the words a processor contributes to its variant key.
#[derive(Debug, Default)]
pub struct KeyBuilder {
    words: SmallVec<[u32; 8]>,
}

impl KeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: u32) {
        self.words.push(word);
    }

    pub fn push_bool(&mut self, value: bool) {
        self.push(u32::from(value));
    }

    pub fn finish(self) -> ProcessorKey {
        ProcessorKey { words: self.words }
    }
}

/// Identity of a compiled shader variant.
///
/// Cheap to clone and hash; used directly as the variant-cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessorKey {
    words: SmallVec<[u32; 8]>,
}

impl ProcessorKey {
    /// Builds the full key for a processor: a word derived from the
    /// processor's name so different processor types never collide, followed
    /// by the processor's own contribution.
    pub fn for_processor(processor: &dyn FragmentProcessor) -> Self {
        let mut hasher = DefaultHasher::new();
        processor.name().hash(&mut hasher);

        let mut builder = KeyBuilder::new();
        builder.push(hasher.finish() as u32);
        processor.write_processor_key(&mut builder);
        builder.finish()
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }
}
