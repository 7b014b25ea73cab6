/// Number of facelets in a state vector (6 faces x 9).
pub const FACELET_COUNT: usize = 54;

/// Number of canonical moves (6 faces x {clockwise, counter-clockwise}).
pub const MOVE_COUNT: usize = 12;

/// Number of movable pieces (8 corners + 12 edges).
pub const PIECE_COUNT: usize = 20;

/// Field delimiter shared by every CSV file the solver reads or writes.
pub const CSV_DELIMITER: u8 = b';';

/// Default number of random trials a single worker runs per batch.
pub const DEFAULT_ATTEMPTS_PER_WORKER: usize = 200;

/// Fallback pool size when the platform cannot report its parallelism.
pub const FALLBACK_WORKERS: usize = 4;
