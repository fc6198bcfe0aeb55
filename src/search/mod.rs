pub mod fulltext;
pub mod relevance;
