// Résumé intake: document text extraction and LLM profile parsing.
// Both steps are tolerant: a failure yields empty text or an empty profile.

pub mod extract;
pub mod parser;
pub mod prompts;

pub use extract::extract_text_or_empty;
pub use parser::parse_profile;
