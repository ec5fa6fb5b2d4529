/// Settings popup UI
pub mod components;
pub mod popup;
