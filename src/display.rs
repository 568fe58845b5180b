pub mod card;
pub mod format;
