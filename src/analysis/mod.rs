mod chapters;
mod classifier;
mod content;
mod duration;
mod organizer;
mod structure;
#[cfg(test)]
mod tests;

pub use chapters::ChapterDetector;
pub use classifier::LineClassifier;
pub use content::word_count;
pub use duration::{DurationEstimate, Rate};
pub use organizer::{
    AuxiliaryContent, ChapterContent, DocumentOrganizer, Footnote, Reference, StructuredDocument,
};
pub use structure::{DocumentStructureFlags, identify_document_structure};
