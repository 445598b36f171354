/// Maximum number of iterations a single `LoopWhile` application may perform.
pub const LOOP_ITERATION_LIMIT: usize = 100;

/// Recursive-call budget given to programs that do not set one explicitly.
///
/// Every recursive re-entry nests a native call frame, so raise this with care.
pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// Size overhead a control token adds on top of its children.
pub const DEFAULT_CONTROL_COST: usize = 2;
