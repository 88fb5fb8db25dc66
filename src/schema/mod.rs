pub mod content;
pub mod dialogue;
pub mod fragment;
pub mod language;
pub mod puzzle;
