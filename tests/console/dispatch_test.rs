//! Dispatch cycle tests through the public console API.

use super::common::{console, console_with, session, session_text, RecordingCamera};
use cam_console::camera::{CameraDevice, PixelFormat, Resolution};
use cam_console::commands::{Dispatch, UNMATCHED_MESSAGE};
use cam_console::console::Cycle;
use pretty_assertions::assert_eq;

#[test]
fn test_unmatched_input_invokes_nothing() {
    let mut console = console();
    let out = session_text(&mut console, "bogus\r");
    assert_eq!(out, format!("{UNMATCHED_MESSAGE}\r\n"));
    assert!(console.camera().applied.borrow().is_empty());
}

#[test]
fn test_unmatched_reports_every_attempt() {
    let mut console = console();
    let mut out = Vec::new();
    let cycle = console.handle_line(b"bogus", &mut out).unwrap();
    let Cycle::Dispatched(Dispatch::Unmatched { attempts }) = cycle else {
        panic!("expected an unmatched dispatch");
    };
    assert_eq!(attempts.len(), console.registry().len());
}

#[test]
fn test_range_rejection_skips_device() {
    let mut console = console();
    let out = session_text(&mut console, "setResolution 7\r");
    assert_eq!(
        out,
        "Invalid <resolution> value, use \"setResolution --help\" for more details.\r\n"
    );
    assert!(console.camera().applied.borrow().is_empty());
}

#[test]
fn test_range_rejection_reaches_handler() {
    let mut console = console();
    let mut out = Vec::new();
    let cycle = console.handle_line(b"setResolution 7", &mut out).unwrap();
    let Cycle::Dispatched(dispatch) = cycle else {
        panic!("line was rejected before dispatch");
    };
    assert_eq!(dispatch.command(), Some("setResolution"));
    assert!(!dispatch.succeeded());
}

#[test]
fn test_missing_value() {
    let mut console = console();
    let out = session_text(&mut console, "setFormat\r");
    assert_eq!(
        out,
        "Missing <format> value, use \"setFormat --help\" for more details.\r\n"
    );
}

#[test]
fn test_help_short_circuit() {
    let mut console = console();
    let out = session_text(&mut console, "setFormat --help\r");
    let lines: Vec<&str> = out.split("\r\n").collect();
    assert_eq!(lines[0], "Usage: ");
    assert_eq!(lines[1], "setFormat [<format>] [--help]");
    assert!(lines.contains(&"Sets the camera format."));
    assert!(lines.contains(&"\t3 -> GRAYSCALE (1 byte per pixel)."));
    assert!(console.camera().applied.borrow().is_empty());
}

#[test]
fn test_single_dash_help_is_unmatched() {
    let mut console = console();
    let out = session_text(&mut console, "takePhoto -help\r");
    assert_eq!(out, format!("{UNMATCHED_MESSAGE}\r\n"));
}

#[test]
fn test_help_lists_commands_in_order() {
    let mut console = console();
    let out = session_text(&mut console, "help\r");
    assert_eq!(
        out,
        "List of commands:\r\n\
         \thelp\t\tShows a list of commands.\r\n\
         \tsetResolution [<resolution>] [--help]\t\tSets the camera resolution.\r\n\
         \tsetFormat [<format>] [--help]\t\tSets the camera format.\r\n\
         \tgetCameraSettings [--help]\t\tShows the camera current settings.\r\n\
         \ttakePhoto [--help]\t\tTake a photo and send it.\r\n"
    );
}

#[test]
fn test_set_format_applies() {
    let mut console = console();
    let out = session_text(&mut console, "setFormat 3\r");
    assert_eq!(
        out,
        "Configuring camera format to: GRAYSCALE (1 byte per pixel).\r\n\
         Camera format applied correctly.\r\n"
    );
    let applied = console.camera().applied.borrow();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].format, PixelFormat::Grayscale);
}

#[test]
fn test_default_settings_report_one_fps() {
    let mut console = console();
    let out = session_text(&mut console, "getCameraSettings\r");
    assert!(out.starts_with("Current camera settings:\r\n"));
    assert!(out.ends_with("\tFPS: 1.\r\n"));
}

#[test]
fn test_device_failure_keeps_previous_settings() {
    let mut console = console_with(RecordingCamera::new(196_608).failing(10));
    let out = session_text(&mut console, "setResolution 0\rgetCameraSettings\r");
    assert!(out.contains(
        "Unexpected error, check syntax with the flag \"--help\" and try again.\r\n"
    ));
    assert!(out.contains("\tResolution: QVGA (320x240).\r\n"));
    // Three tries per configure by default.
    assert_eq!(console.camera().applied.borrow().len(), 3);
}

#[test]
fn test_transient_device_failure_recovers() {
    let mut console = console_with(RecordingCamera::new(196_608).failing(2));
    let out = session_text(&mut console, "setResolution 3\r");
    assert!(out.ends_with("Camera resolution applied correctly.\r\n"));
    assert_eq!(console.camera().settings().resolution, Resolution::Qcif);
}

#[test]
fn test_take_photo_framing() {
    let mut console = console();
    let (stats, out) = session(&mut console, b"setResolution 4\rtakePhoto\r");
    assert_eq!(stats.invoked, 2);

    let prefix = b"Configuring camera resolution to: QQVGA (160x120).\r\n\
                   Camera resolution applied correctly.\r\n";
    assert!(out.starts_with(prefix));
    let payload = &out[prefix.len()..];
    assert_eq!(payload.len(), 160 * 120 * 2 + 2);
    assert!(payload.ends_with(b"\r\n"));
}

#[test]
fn test_take_photo_out_of_memory() {
    let mut console = console();
    let out = session_text(&mut console, "setResolution 0\rtakePhoto\r");
    assert!(out.ends_with(
        "No enough memory for frame buffer, requested: 614400 bytes. \
         Try to downgrade the camera resolution and format.\r\n\
         Failed to take photo.\r\n"
    ));
}

#[test]
fn test_session_survives_errors() {
    let mut console = console();
    let (stats, _) = session(
        &mut console,
        b"bogus\r\nsetResolution 9\r\nsetResolution \"2\r\ngetCameraSettings\r\n",
    );
    assert_eq!(stats.lines, 4);
    assert_eq!(stats.unmatched, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.invoked, 2);
}
