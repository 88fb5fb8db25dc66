//! Story Interactions: dialogue, retelling puzzles and a story journal
//! for bilingual (Spanish/English) narrative games.
//!
//! The host engine supplies rendering and player movement through the
//! traits in [`core::view`] and [`core::lock`], feeds input as
//! [`core::session::InputEvent`]s and advances time with
//! [`core::session::Interactions::tick`]. Authored content is loaded
//! from RON into a [`schema::content::ContentLibrary`].

pub mod core;
pub mod schema;
