pub mod chapter_select;
pub mod progress_bar;
pub mod quiz_page;
pub mod score_panel;
