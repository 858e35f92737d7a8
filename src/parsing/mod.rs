pub mod extractor;
pub mod repair;
pub mod segmenter;

pub use extractor::{extract_block, locate_candidate, Candidate, ExtractionStrategy};
pub use repair::{apply_transforms, repair, Repaired, Transform, TRANSFORMS};
pub use segmenter::{
    extract_dining_lines, extract_section, first_paragraph, segment, split_days,
};
