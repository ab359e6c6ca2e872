pub mod analyze;
pub mod clean;
pub mod click;
pub mod quotes;
pub mod sentences;
pub mod status;
pub mod text;
