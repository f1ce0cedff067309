// Career assessment: submission validation, trait scoring, and the submit/download API.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod scoring;
