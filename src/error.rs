pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The failure signals that cross component boundaries during solving.
///
/// `Inconsistency` is the only variant raised during normal propagation; it
/// unwinds to the nearest branch scope of a search, or to the caller when a
/// top-level `post` detects infeasibility. `StopSearch` is raised by the
/// search-limit predicate and caught exactly once in `solve`. `EmptyDomain`
/// is a model-construction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("inconsistency: a variable domain became empty")]
    Inconsistency,
    #[error("search stopped by the limit predicate")]
    StopSearch,
    #[error("a variable cannot be created from an empty set of values")]
    EmptyDomain,
}
