pub mod threaded_analysis_executor;
