use stack_args::{make_error, Code};

#[test]
fn test_error_records_location() {
    let e = make_error!(Code::NoEnoughMemory);
    assert_eq!(e.cause(), Code::NoEnoughMemory);
    assert!(e.file().ends_with("error.rs"));
    assert_eq!(e.line(), 5);
    assert_eq!(
        e.to_string(),
        format!("NoEnoughMemory in {} at {}", e.file(), e.line())
    );
}

#[test]
fn test_exit_status() {
    assert_eq!(Code::NoEnoughMemory.exit_status(), 12);
    assert_eq!(Code::TooManyArguments.exit_status(), 7);
    for code in [Code::AlreadyAllocated, Code::Full] {
        assert_ne!(code.exit_status(), 0);
    }
    assert_eq!(make_error!(Code::Full).exit_status(), Code::Full.exit_status());
}
