pub mod indicators;
pub mod job_scheduler_service;
pub mod news_service;
pub mod notification_service;
pub mod rate_limiter;
pub mod relevance;
pub mod report_assembly;
pub mod seen_links;
pub mod selection_scorer;
pub mod translation_service;
