pub mod analyzer;
pub mod ats;
pub mod contact;
pub mod engine;
pub mod handlers;
pub mod improvements;
pub mod industry;
pub mod issues;
pub mod keywords;
pub mod match_score;
pub mod prompts;
pub mod sanitize;
pub mod section_scoring;
pub mod segmenter;
