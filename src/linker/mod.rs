pub mod deferred;

pub use deferred::{DeferredReferences, PendingReferences};

pub mod reference_linker;
pub use reference_linker::{LinkStats, ReferenceLinker, ResolutionMode};
