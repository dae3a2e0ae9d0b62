pub mod cache;
pub mod concat;
pub mod dedup;
pub mod error;
pub mod input;
pub mod matrix;
pub mod problems;
pub mod regions;
pub mod result_set;

pub use cache::{already_done, find_existing};
pub use concat::{concat_results, output_filename, ConcatOutcome};
pub use dedup::{duplicate_kind, is_duplicate, DedupCache, DuplicateKind, DuplicateReport};
pub use error::{InputError, StoreError};
pub use input::read_origins;
pub use matrix::{augmented_sibling, list_plain_results, write_matrix_problem, MatrixSource};
pub use problems::write_problem;
pub use regions::{classify_and_move, infer_region, RegionOutcome};
pub use result_set::{first_city_state, read_result_rows, write_result_set, ResultRow, RESULT_HEADER};
