// tests/logging_filter.rs

use taskdag::cli::LogLevel;
use taskdag::logging::build_filter;

#[test]
fn cli_level_wins_over_environment() {
    let rendered = build_filter(Some(LogLevel::Trace), Some("warn"))
        .unwrap()
        .to_string();
    assert!(rendered.contains("trace"), "got {rendered}");
    assert!(!rendered.contains("warn"), "got {rendered}");
}

#[test]
fn environment_directives_are_used_when_no_flag_is_given() {
    let filter = build_filter(None, Some("taskdag::dag=debug,warn")).unwrap();
    let rendered = filter.to_string();
    assert!(rendered.contains("taskdag::dag=debug"), "got {rendered}");
    assert!(rendered.contains("warn"), "got {rendered}");
}

#[test]
fn blank_or_missing_environment_falls_back_to_info() {
    for env in [None, Some(""), Some("   ")] {
        let rendered = build_filter(None, env).unwrap().to_string();
        assert!(rendered.contains("info"), "got {rendered}");
    }
}

#[test]
fn malformed_directives_are_reported() {
    let err = build_filter(None, Some("taskdag=loud")).unwrap_err();
    assert!(err.to_string().contains("TASKDAG_LOG"));
}

#[test]
fn every_cli_level_is_a_valid_directive() {
    for level in [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        assert!(build_filter(Some(level), None).is_ok());
    }
}
