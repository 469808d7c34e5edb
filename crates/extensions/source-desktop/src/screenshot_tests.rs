use super::*;

#[test]
fn test_screenshot_error_display() {
    let err = ScreenshotError::CaptureFailed("test error".to_string());
    assert_eq!(err.to_string(), "Capture failed: test error");

    let err = ScreenshotError::EncodingFailed("encoding error".to_string());
    assert_eq!(err.to_string(), "Encoding failed: encoding error");

    assert_eq!(ScreenshotError::NoMonitor.to_string(), "No monitor found");
}

#[test]
fn test_screenshot_error_into_capture_error() {
    let err = CaptureError::from(ScreenshotError::NoMonitor);
    assert_eq!(err, CaptureError::Capture("No monitor found".to_string()));
}

#[test]
fn test_screen_offset_primary_origin() {
    let region = CaptureRegion::from_corners(100, 200, 400, 260).unwrap();
    assert_eq!(screen_offset(&region, 0, 0), (100, 200));
}

#[test]
fn test_screen_offset_secondary_monitor() {
    let region = CaptureRegion::from_corners(-1800, 50, -1500, 120).unwrap();
    assert_eq!(screen_offset(&region, -1920, 0), (120, 50));
}

// Integration tests that require actual screen access
#[test]
#[ignore] // Requires actual display
fn test_capture_primary_screen() {
    let shot = PrimaryScreen.capture(None).unwrap();
    assert!(shot.width > 0);
    assert!(shot.height > 0);
    assert!(!shot.data.is_empty());
}

#[test]
#[ignore] // Requires actual display
fn test_capture_region() {
    let region = CaptureRegion::from_corners(0, 0, 100, 100).unwrap();
    let shot = PrimaryScreen.capture(Some(region)).unwrap();
    assert!(shot.width <= 100);
    assert!(shot.height <= 100);
}
