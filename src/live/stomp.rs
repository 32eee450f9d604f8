//! STOMP 1.2 frame codec (text bodies only).

use super::LiveError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) command: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: String,
}

impl Frame {
    pub(crate) fn new(command: &str) -> Self {
        Self { command: command.to_string(), headers: Vec::new(), body: String::new() }
    }

    pub(crate) fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[cfg(test)]
    pub(crate) fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// First occurrence wins when a header is repeated.
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub(crate) fn connect(host: &str) -> Self {
        Self::new("CONNECT")
            .header("accept-version", "1.1,1.2")
            .header("host", host)
            .header("heart-beat", "0,0")
    }

    pub(crate) fn subscribe(id: &str, destination: &str) -> Self {
        Self::new("SUBSCRIBE").header("id", id).header("destination", destination)
    }

    pub(crate) fn disconnect() -> Self {
        Self::new("DISCONNECT")
    }

    pub(crate) fn encode(&self) -> String {
        let escape = escapes_headers(&self.command);
        let mut out = String::with_capacity(self.command.len() + self.body.len() + 32);
        out.push_str(&self.command);
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }
}

fn escapes_headers(command: &str) -> bool {
    !matches!(command, "CONNECT" | "CONNECTED")
}

/// Splits a transport message into frames. Bare EOLs between frames are
/// heart-beats and are dropped.
pub(crate) fn decode_all(data: &str) -> Result<Vec<Frame>, LiveError> {
    let mut frames = Vec::new();
    for chunk in data.split('\0') {
        let chunk = chunk.trim_start_matches(['\r', '\n']);
        if chunk.is_empty() {
            continue;
        }
        frames.push(decode_frame(chunk)?);
    }
    Ok(frames)
}

fn decode_frame(chunk: &str) -> Result<Frame, LiveError> {
    let (head, body) = split_head(chunk)
        .ok_or_else(|| LiveError::Protocol("frame without header terminator".to_string()))?;

    let mut lines = head.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    let command = lines.next().unwrap_or_default().to_string();
    if command.is_empty() {
        return Err(LiveError::Protocol("frame without command".to_string()));
    }

    let escape = escapes_headers(&command);
    let mut headers = Vec::new();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            return Err(LiveError::Protocol(format!("malformed header line {line:?}")));
        };
        if escape {
            headers.push((unescape_header(name)?, unescape_header(value)?));
        } else {
            headers.push((name.to_string(), value.to_string()));
        }
    }

    Ok(Frame { command, headers, body: body.to_string() })
}

fn split_head(chunk: &str) -> Option<(&str, &str)> {
    let lf = chunk.find("\n\n").map(|index| (index, 2));
    let crlf = chunk.find("\r\n\r\n").map(|index| (index, 4));
    let (index, width) = match (lf, crlf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => {
            // A frame may end right after its last header.
            let trimmed = chunk.strip_suffix('\n')?;
            return Some((trimmed.strip_suffix('\r').unwrap_or(trimmed), ""));
        }
    };
    Some((&chunk[..index], &chunk[index + width..]))
}

fn escape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape_header(value: &str) -> Result<String, LiveError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            other => {
                return Err(LiveError::Protocol(format!("undefined header escape {other:?}")));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_frame_is_not_escaped() {
        let encoded = Frame::connect("localhost:8080").encode();
        assert_eq!(
            encoded,
            "CONNECT\naccept-version:1.1,1.2\nhost:localhost:8080\nheart-beat:0,0\n\n\0"
        );
    }

    #[test]
    fn subscribe_frame_escapes_colons() {
        let encoded = Frame::subscribe("sub-0", "/topic/a:b").encode();
        assert_eq!(encoded, "SUBSCRIBE\nid:sub-0\ndestination:/topic/a\\cb\n\n\0");
    }

    #[test]
    fn decodes_message_batch_with_heartbeats() {
        let data = "\nMESSAGE\r\nsubscription:sub-0\r\ndestination:/topic/answers/5\r\n\r\n{\"1\":\"A\"}\0\n\
                    MESSAGE\nsubscription:sub-0\nmessage-id:a\\cb\n\n{}\0";
        let frames = decode_all(data).expect("frames");

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].command, "MESSAGE");
        assert_eq!(frames[0].get("destination"), Some("/topic/answers/5"));
        assert_eq!(frames[0].body, "{\"1\":\"A\"}");
        assert_eq!(frames[1].get("message-id"), Some("a:b"));
        assert_eq!(frames[1].body, "{}");
    }

    #[test]
    fn connected_frame_keeps_raw_header_values() {
        let frames = decode_all("CONNECTED\nversion:1.2\nserver:x\\y\n\n\0").expect("frames");
        assert_eq!(frames[0].get("server"), Some("x\\y"));
    }

    #[test]
    fn repeated_headers_resolve_to_first_value() {
        let frames = decode_all("MESSAGE\nfoo:1\nfoo:2\n\nbody\0").expect("frames");
        assert_eq!(frames[0].get("foo"), Some("1"));
    }

    #[test]
    fn rejects_undefined_escape_and_bad_header_line() {
        assert!(matches!(decode_all("MESSAGE\nfoo:\\t\n\n\0"), Err(LiveError::Protocol(_))));
        assert!(matches!(decode_all("MESSAGE\nnocolon\n\n\0"), Err(LiveError::Protocol(_))));
    }

    #[test]
    fn heartbeat_only_payload_has_no_frames() {
        assert!(decode_all("\n").expect("heartbeat").is_empty());
    }
}
