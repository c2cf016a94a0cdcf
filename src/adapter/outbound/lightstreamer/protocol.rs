//! Lightstreamer TLCP text protocol.
//!
//! Requests are a name line plus a `&`-joined, percent-encoded parameter
//! line. Server notifications are comma-separated lines; one WebSocket text
//! frame may carry several of them separated by CRLF.

use crate::error::{Error, Result};
use crate::port::SubscriptionRequest;

/// WebSocket subprotocol announced on connect.
pub const SUBPROTOCOL: &str = "TLCP-2.2.0.lightstreamer.com";

/// Change to one field carried by a `U` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Unchanged,
    Set(Option<String>),
}

/// One server notification line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    ConOk {
        session_id: String,
        request_limit: u64,
        keepalive_ms: u64,
    },
    ConErr {
        code: i32,
        message: String,
    },
    End {
        code: i32,
        message: String,
    },
    Loop {
        delay_ms: u64,
    },
    Probe,
    Noop,
    Sync {
        seconds: u64,
    },
    SubOk {
        sub_id: u32,
        items: usize,
        fields: usize,
    },
    /// Field values stay encoded until the subscription's schema is known;
    /// see [`decode_changes`].
    Update {
        sub_id: u32,
        item: usize,
        values: String,
    },
    EndOfSnapshot {
        sub_id: u32,
        item: usize,
    },
    ClearSnapshot {
        sub_id: u32,
        item: usize,
    },
    Unsubscribed {
        sub_id: u32,
    },
    Overflow {
        sub_id: u32,
        item: usize,
        lost: u64,
    },
    ReqOk {
        req_id: Option<u64>,
    },
    ReqErr {
        req_id: u64,
        code: i32,
        message: String,
    },
    Error {
        code: i32,
        message: String,
    },
    /// Notifications that carry nothing the adapter acts on
    /// (`SERVNAME`, `CLIENTIP`, `CONS`, `PROG`, `CONF`, `WSOK`, `MSGDONE`, `MSGFAIL`).
    Info {
        tag: String,
        args: String,
    },
}

/// Parse one notification line (without the trailing CRLF).
pub fn parse_line(line: &str) -> Result<ServerMessage> {
    let (tag, rest) = line.split_once(',').unwrap_or((line, ""));

    let message = match tag {
        "CONOK" => {
            let mut parts = rest.split(',');
            let session_id = required(parts.next(), "CONOK session")?.to_string();
            let request_limit = number(parts.next(), "CONOK request limit")?;
            let keepalive_ms = number(parts.next(), "CONOK keepalive")?;
            ServerMessage::ConOk {
                session_id,
                request_limit,
                keepalive_ms,
            }
        }
        "CONERR" => {
            let (code, message) = code_and_message(rest)?;
            ServerMessage::ConErr { code, message }
        }
        "END" => {
            let (code, message) = code_and_message(rest)?;
            ServerMessage::End { code, message }
        }
        "ERROR" => {
            let (code, message) = code_and_message(rest)?;
            ServerMessage::Error { code, message }
        }
        "LOOP" => ServerMessage::Loop {
            delay_ms: number(Some(rest), "LOOP delay")?,
        },
        "PROBE" => ServerMessage::Probe,
        "NOOP" => ServerMessage::Noop,
        "SYNC" => ServerMessage::Sync {
            seconds: number(Some(rest), "SYNC seconds")?,
        },
        "SUBOK" | "SUBCMD" => {
            let mut parts = rest.split(',');
            let sub_id = number(parts.next(), "SUBOK subscription")?;
            let items = number(parts.next(), "SUBOK items")?;
            let fields = number(parts.next(), "SUBOK fields")?;
            ServerMessage::SubOk {
                sub_id,
                items,
                fields,
            }
        }
        "U" => {
            let mut parts = rest.splitn(3, ',');
            let sub_id = number(parts.next(), "U subscription")?;
            let item = number(parts.next(), "U item")?;
            let values = parts.next().unwrap_or_default().to_string();
            ServerMessage::Update {
                sub_id,
                item,
                values,
            }
        }
        "EOS" | "CS" => {
            let mut parts = rest.split(',');
            let sub_id = number(parts.next(), "snapshot subscription")?;
            let item = number(parts.next(), "snapshot item")?;
            if tag == "EOS" {
                ServerMessage::EndOfSnapshot { sub_id, item }
            } else {
                ServerMessage::ClearSnapshot { sub_id, item }
            }
        }
        "UNSUB" => ServerMessage::Unsubscribed {
            sub_id: number(Some(rest), "UNSUB subscription")?,
        },
        "OV" => {
            let mut parts = rest.split(',');
            ServerMessage::Overflow {
                sub_id: number(parts.next(), "OV subscription")?,
                item: number(parts.next(), "OV item")?,
                lost: number(parts.next(), "OV lost")?,
            }
        }
        "REQOK" => ServerMessage::ReqOk {
            req_id: if rest.is_empty() {
                None
            } else {
                Some(number(Some(rest), "REQOK request")?)
            },
        },
        "REQERR" => {
            let (req_id, rest) = rest.split_once(',').unwrap_or((rest, ""));
            let req_id = number(Some(req_id), "REQERR request")?;
            let (code, message) = code_and_message(rest)?;
            ServerMessage::ReqErr {
                req_id,
                code,
                message,
            }
        }
        "SERVNAME" | "CLIENTIP" | "CONS" | "PROG" | "CONF" | "WSOK" | "MSGDONE" | "MSGFAIL" => {
            ServerMessage::Info {
                tag: tag.to_string(),
                args: rest.to_string(),
            }
        }
        other => {
            return Err(Error::Protocol(format!("unknown notification '{other}'")));
        }
    };

    Ok(message)
}

/// Decode the `|`-separated field list of a `U` notification against a
/// schema of `field_count` fields.
///
/// Empty means unchanged, `#` null, `$` empty string, `^N` N unchanged
/// fields; anything else is a percent-encoded value. A list describing more
/// fields than the schema has is rejected.
pub fn decode_changes(raw: &str, field_count: usize) -> Result<Vec<FieldChange>> {
    let mut changes = Vec::with_capacity(field_count);
    for token in raw.split('|') {
        let remaining = field_count - changes.len();
        let count = match token {
            skip if skip.starts_with('^') => skip[1..]
                .parse()
                .map_err(|_| Error::Protocol(format!("bad field skip '{skip}'")))?,
            _ => 1,
        };
        if count > remaining {
            return Err(Error::Protocol(format!(
                "update describes more than {field_count} fields"
            )));
        }

        match token {
            "" => changes.push(FieldChange::Unchanged),
            "#" => changes.push(FieldChange::Set(None)),
            "$" => changes.push(FieldChange::Set(Some(String::new()))),
            skip if skip.starts_with('^') => {
                changes.extend(std::iter::repeat(FieldChange::Unchanged).take(count));
            }
            value => changes.push(FieldChange::Set(Some(percent_decode(value)?))),
        }
    }
    Ok(changes)
}

/// Apply decoded changes to the previous field values of an item.
pub fn apply_changes(values: &mut [Option<String>], changes: Vec<FieldChange>) {
    for (slot, change) in values.iter_mut().zip(changes) {
        if let FieldChange::Set(value) = change {
            *slot = value;
        }
    }
}

/// `create_session` request for a WebSocket transport.
#[must_use]
pub fn create_session_request(adapter_set: &str, client_id: &str) -> String {
    format!(
        "create_session\r\nLS_cid={}&LS_adapter_set={}&LS_send_sync=false&LS_cause=api\r\n",
        percent_encode(client_id),
        percent_encode(adapter_set)
    )
}

/// `control` request adding one subscription to the bound session.
#[must_use]
pub fn subscribe_request(req_id: u64, sub_id: u32, request: &SubscriptionRequest) -> String {
    format!(
        "control\r\nLS_reqId={req_id}&LS_op=add&LS_subId={sub_id}&LS_mode={}&LS_group={}&LS_schema={}&LS_snapshot={}\r\n",
        request.mode.as_str(),
        percent_encode(&request.item),
        percent_encode(&request.fields.join(" ")),
        request.snapshot
    )
}

fn required<'a>(part: Option<&'a str>, what: &str) -> Result<&'a str> {
    part.filter(|p| !p.is_empty())
        .ok_or_else(|| Error::Protocol(format!("missing {what}")))
}

fn number<T: std::str::FromStr>(part: Option<&str>, what: &str) -> Result<T> {
    let raw = required(part, what)?;
    raw.parse()
        .map_err(|_| Error::Protocol(format!("invalid {what} '{raw}'")))
}

fn code_and_message(rest: &str) -> Result<(i32, String)> {
    let (code, message) = rest.split_once(',').unwrap_or((rest, ""));
    Ok((number(Some(code), "error code")?, percent_decode(message)?))
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

fn percent_decode(value: &str) -> Result<String> {
    if !value.contains('%') {
        return Ok(value.to_string());
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = value
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| Error::Protocol(format!("bad percent escape in '{value}'")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| Error::Protocol(format!("non UTF-8 value '{value}'")))
}
