// Candidates: résumé upload, listing and detail pages.

pub mod handlers;
pub mod upload;
