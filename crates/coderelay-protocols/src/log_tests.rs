use super::*;
use std::sync::{Arc, Mutex};

#[test]
fn test_closure_is_a_sink() {
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let captured = lines.clone();
    let sink = move |m: &str| captured.lock().unwrap().push(m.to_string());

    sink.log("first");
    LogSink::log(&sink, "second");

    assert_eq!(*lines.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn test_console_line_format() {
    let line = ConsoleLogSink::format_line("NEW CODE FOUND: ABC123");
    // "[HH:MM:SS] " prefix
    assert_eq!(line.as_bytes()[0], b'[');
    assert_eq!(&line[9..11], "] ");
    assert!(line.ends_with("NEW CODE FOUND: ABC123"));
}

#[tokio::test]
async fn test_channel_sink_delivers_lines() {
    let (sink, mut rx) = ChannelLogSink::new();
    sink.log("hello");
    let line = rx.recv().await.unwrap();
    assert!(line.ends_with("hello"));
}

#[test]
fn test_channel_sink_ignores_dropped_receiver() {
    let (sink, rx) = ChannelLogSink::new();
    drop(rx);
    sink.log("nobody listening");
}

#[test]
fn test_sinks_are_object_safe() {
    let sinks: Vec<Arc<dyn LogSink>> = vec![Arc::new(TracingLogSink), Arc::new(ConsoleLogSink)];
    for sink in sinks {
        sink.log("ok");
    }
}
