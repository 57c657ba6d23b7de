pub mod chart_service;
pub mod dashboard_service;
pub mod format_service;
pub mod notify_service;
pub mod rules_service;
