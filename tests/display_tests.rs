//! Tests for display and formatting utilities.

use lunomax::display::{format_amount, format_luno};

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(120.0), "120");
    assert_eq!(format_amount(0.0), "0");
    assert_eq!(format_amount(7.5), "7.5");
    assert_eq!(format_amount(0.25), "0.2");
}

#[test]
fn test_format_luno() {
    assert_eq!(format_luno(0.0), "0");
    assert_eq!(format_luno(999.0), "999");
    assert_eq!(format_luno(1600.0), "1,600");
    assert_eq!(format_luno(1234567.0), "1,234,567");
    assert_eq!(format_luno(-2500.0), "-2,500");
}
