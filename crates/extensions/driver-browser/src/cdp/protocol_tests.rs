use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 7,
        method: "DOM.querySelector".to_string(),
        params: Some(serde_json::json!({"nodeId": 1, "selector": "input[type='text']"})),
        session_id: Some("SESSION".to_string()),
    };
    let json: Value = serde_json::to_value(&req).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["method"], "DOM.querySelector");
    assert_eq!(json["sessionId"], "SESSION");
    assert_eq!(json["params"]["selector"], "input[type='text']");
}

#[test]
fn test_cdp_request_omits_empty_fields() {
    let req = CdpRequest {
        id: 1,
        method: "Page.reload".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert_eq!(json, r#"{"id":1,"method":"Page.reload"}"#);
}

#[test]
fn test_cdp_response_deserialize() {
    let json = r#"{"id": 1, "result": {"frameId": "abc"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert_eq!(resp.result.unwrap()["frameId"], "abc");
}

#[test]
fn test_cdp_error_response_deserialize() {
    let json = r#"{"id": 3, "error": {"code": -32000, "message": "No node"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    let error = resp.error.unwrap();
    assert_eq!(error.code, -32000);
    assert_eq!(error.message, "No node");
    assert!(error.data.is_none());
}

#[test]
fn test_event_deserialize() {
    let json = r#"{"method": "Page.loadEventFired", "params": {"timestamp": 1.5}, "sessionId": "S1"}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert!(resp.id.is_none());
    assert_eq!(resp.method.as_deref(), Some("Page.loadEventFired"));
    assert_eq!(resp.session_id.as_deref(), Some("S1"));
}

#[test]
fn test_page_info_deserialize() {
    let json = r#"{
        "id": "page123",
        "type": "page",
        "title": "Bonus",
        "url": "https://example.com/bonus",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/page123"
    }"#;
    let info: PageInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.id, "page123");
    assert_eq!(info.page_type, "page");
}

#[test]
fn test_browser_version_deserialize() {
    let json = r#"{
        "Browser": "Chrome/120.0.0.0",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/abc"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert_eq!(version.browser, "Chrome/120.0.0.0");
    assert!(version.web_socket_debugger_url.starts_with("ws://"));
}

#[test]
fn test_key_event_type_serialize() {
    assert_eq!(serde_json::to_string(&KeyEventType::KeyDown).unwrap(), "\"keyDown\"");
    assert_eq!(serde_json::to_string(&KeyEventType::RawKeyDown).unwrap(), "\"rawKeyDown\"");
}
