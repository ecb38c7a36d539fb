pub mod complexity;
pub mod components;
pub mod deadcode;

pub use complexity::ComplexityScorer;
pub use components::ComponentMapper;
pub use deadcode::DeadCodeDetector;
