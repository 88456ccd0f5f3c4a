pub mod chart;
pub mod insight;
pub mod report;
pub mod results;
pub mod session;

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        // Test that all route module constants are accessible
        assert_eq!(super::results::POST_UPLOAD, "post_upload");
        assert_eq!(super::insight::POST_ANALYZE, "post_analyze");
        assert_eq!(super::insight::POST_RANK_SCHEDULE, "post_rank_schedule");
        assert_eq!(super::report::GET_REPORT, "get_report");
        assert_eq!(super::session::POST_SESSION, "store_session");
        assert_eq!(super::session::GET_SESSION, "get_session");
        assert_eq!(super::session::DELETE_SESSION, "delete_session");
        assert_eq!(super::session::POST_SEARCH, "post_search");
        assert_eq!(super::session::GET_EXPORT_CSV, "get_export_csv");
    }
}
