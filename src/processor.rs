//! The fragment-processor family.
//!
//! A fragment processor describes one per-pixel color transformation stage.
//! The pipeline treats the family as an open polymorphic set: any processor
//! can contribute a cache-key fragment, produce the fragment-stage source the
//! backend compiles, report its effect on statically-known output color, and
//! compare itself against any other member of the family.

use std::any::Any;
use std::fmt;

use crate::invariant::InvariantOutput;
use crate::key::KeyBuilder;
use crate::wgsl;

/// A per-pixel color transformation stage of the blur pipeline.
///
/// Implementations are immutable values: every method is a side-effect-free
/// read, so processors can be shared across threads freely.
pub trait FragmentProcessor: fmt::Debug + Send + Sync {
    /// Processor name, used in labels, logs and the variant-key prefix.
    fn name(&self) -> &'static str;

    /// Writes the words identifying this processor's compiled shader shape.
    /// Processors with equal key contributions share one GPU pipeline.
    fn write_processor_key(&self, builder: &mut KeyBuilder);

    /// Produces the fragment-stage source the shader backend compiles.
    fn program_source(&self) -> ProgramSource;

    /// Folds this processor's effect on statically-known output color into
    /// the accumulator.
    fn track_invariant_output(&self, inout: &mut InvariantOutput);

    /// The concrete value, for dynamic comparisons.
    fn as_any(&self) -> &dyn Any;

    /// Structural equality across the family. Implementations downcast
    /// `other` and compare fields; processors of different concrete types
    /// are never equal.
    fn processor_eq(&self, other: &dyn FragmentProcessor) -> bool;
}

/// Shader source for one processor, consumed by the pipeline backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    /// Fragment stage WGSL, including any uniform declarations it needs.
    pub fragment_wgsl: String,
    /// Entry point of the fragment stage.
    pub entry_point: &'static str,
    /// Whether the stage binds the parameter uniform at group 1.
    pub uses_params: bool,
}

/// Samples the source texture unchanged.
///
/// The no-op member of the processor family, used to composite an offscreen
/// result without filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassthroughEffect;

impl FragmentProcessor for PassthroughEffect {
    fn name(&self) -> &'static str {
        "Passthrough"
    }

    fn write_processor_key(&self, _builder: &mut KeyBuilder) {}

    fn program_source(&self) -> ProgramSource {
        ProgramSource {
            fragment_wgsl: wgsl::passthrough_fragment(),
            entry_point: wgsl::PASSTHROUGH_ENTRY,
            uses_params: false,
        }
    }

    fn track_invariant_output(&self, _inout: &mut InvariantOutput) {
        // Identity: whatever was known about the input stays known.
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn processor_eq(&self, other: &dyn FragmentProcessor) -> bool {
        other.as_any().downcast_ref::<Self>().is_some()
    }
}
