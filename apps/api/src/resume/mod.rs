pub mod cover_letter;
pub mod extract;
pub mod feedback;
pub mod fit_scoring;
pub mod handlers;
pub mod posting_parser;
pub mod prompts;
pub mod tone;
