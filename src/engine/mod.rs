pub mod chapter_order;
pub mod grader;
