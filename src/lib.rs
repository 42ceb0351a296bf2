//! Backend for PromptWise, a prompt-to-flashcards app: a signed-in user
//! submits a text prompt, previews the generated cards and saves them as a
//! named collection in their per-user store. Authentication, generation and
//! payment all live behind remote collaborators; the one piece of logic this
//! crate owns is the atomic collection save in [`db::save_collection`].

pub mod clients;
pub mod config;
pub mod db;
pub mod routes;
pub mod templates;
