//! SockJS framing over a raw WebSocket transport.
//!
//! Server frames: `o` open, `h` heartbeat, `a[...]` message batch, `m"..."`
//! single message, `c[code,"reason"]` close. Client frames are JSON arrays of
//! strings.

use rand::Rng;
use reqwest::Url;
use uuid::Uuid;

use super::LiveError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SockJsFrame {
    Open,
    Heartbeat,
    Messages(Vec<String>),
    Close { code: u16, reason: String },
}

pub(crate) fn decode(raw: &str) -> Result<SockJsFrame, LiveError> {
    let Some(kind) = raw.chars().next() else {
        return Err(LiveError::Protocol("empty sockjs frame".to_string()));
    };
    let rest = &raw[kind.len_utf8()..];

    match kind {
        'o' => Ok(SockJsFrame::Open),
        'h' => Ok(SockJsFrame::Heartbeat),
        'a' => serde_json::from_str::<Vec<String>>(rest)
            .map(SockJsFrame::Messages)
            .map_err(|err| LiveError::Protocol(format!("invalid sockjs batch: {err}"))),
        'm' => serde_json::from_str::<String>(rest)
            .map(|message| SockJsFrame::Messages(vec![message]))
            .map_err(|err| LiveError::Protocol(format!("invalid sockjs message: {err}"))),
        'c' => serde_json::from_str::<(u16, String)>(rest)
            .map(|(code, reason)| SockJsFrame::Close { code, reason })
            .map_err(|err| LiveError::Protocol(format!("invalid sockjs close: {err}"))),
        other => Err(LiveError::Protocol(format!("unknown sockjs frame type {other:?}"))),
    }
}

pub(crate) fn encode(messages: &[String]) -> Result<String, LiveError> {
    serde_json::to_string(messages).map_err(|err| LiveError::Protocol(err.to_string()))
}

/// `{endpoint}/{server}/{session}/websocket` with the scheme switched to ws/wss.
pub(crate) fn transport_url(endpoint: &Url) -> Result<Url, LiveError> {
    let scheme = match endpoint.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(LiveError::Endpoint(format!("unsupported scheme {other}"))),
    };

    let mut url = endpoint.clone();
    url.set_scheme(scheme).map_err(|_| LiveError::Endpoint(endpoint.to_string()))?;

    let server_id: u16 = rand::thread_rng().gen_range(0..1000);
    let session_id = Uuid::new_v4().simple().to_string();
    let path =
        format!("{}/{server_id:03}/{session_id}/websocket", endpoint.path().trim_end_matches('/'));
    url.set_path(&path);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_frames() {
        assert_eq!(decode("o").expect("open"), SockJsFrame::Open);
        assert_eq!(decode("h").expect("heartbeat"), SockJsFrame::Heartbeat);
        assert_eq!(
            decode(r#"a["MESSAGE\n\n{}\u0000","x"]"#).expect("batch"),
            SockJsFrame::Messages(vec!["MESSAGE\n\n{}\0".to_string(), "x".to_string()])
        );
        assert_eq!(
            decode(r#"m"single""#).expect("single"),
            SockJsFrame::Messages(vec!["single".to_string()])
        );
        assert_eq!(
            decode(r#"c[3000,"Go away!"]"#).expect("close"),
            SockJsFrame::Close { code: 3000, reason: "Go away!".to_string() }
        );
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(matches!(decode(""), Err(LiveError::Protocol(_))));
        assert!(matches!(decode("x"), Err(LiveError::Protocol(_))));
        assert!(matches!(decode("a{"), Err(LiveError::Protocol(_))));
    }

    #[test]
    fn encodes_client_batch_as_json_array() {
        let encoded = encode(&["SEND\n\nhi\0".to_string()]).expect("encode");
        assert_eq!(encoded, r#"["SEND\n\nhi\u0000"]"#);
    }

    #[test]
    fn transport_url_switches_scheme_and_appends_session() {
        let endpoint = Url::parse("https://training.example.com/giiku/ws").expect("url");
        let url = transport_url(&endpoint).expect("transport");

        assert_eq!(url.scheme(), "wss");
        let segments: Vec<&str> = url.path_segments().expect("segments").collect();
        assert_eq!(segments.len(), 5);
        assert_eq!(&segments[..2], &["giiku", "ws"]);
        assert_eq!(segments[2].len(), 3);
        assert!(segments[2].chars().all(|ch| ch.is_ascii_digit()));
        assert_eq!(segments[3].len(), 32);
        assert_eq!(segments[4], "websocket");
    }
}
