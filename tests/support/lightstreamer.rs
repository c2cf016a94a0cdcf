//! Scripted Lightstreamer server on a local socket.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

use tankwatch::adapter::outbound::lightstreamer::protocol::SUBPROTOCOL;
use tankwatch::adapter::outbound::lightstreamer::LightstreamerSettings;

/// What the server writes and when.
pub struct Script {
    /// Sent in reply to `create_session`.
    pub on_session: String,
    /// Sent one frame each in reply to the first `control` request.
    pub on_subscribe: Vec<String>,
}

/// Accept one client, play `script`, then stay silent with the socket open
/// until the client goes away.
pub async fn serve_once(script: Script) -> (LightstreamerSettings, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let echo_subprotocol = |_: &Request, mut response: Response| -> Result<Response, ErrorResponse> {
            response
                .headers_mut()
                .insert("Sec-WebSocket-Protocol", HeaderValue::from_static(SUBPROTOCOL));
            Ok(response)
        };
        let mut ws = accept_hdr_async(stream, echo_subprotocol)
            .await
            .expect("handshake");

        if let Some(Ok(Message::Text(request))) = ws.next().await {
            assert!(request.starts_with("create_session"), "unexpected {request}");
            ws.send(Message::Text(script.on_session)).await.expect("send");
        }

        if let Some(Ok(Message::Text(request))) = ws.next().await {
            assert!(request.starts_with("control"), "unexpected {request}");
            for frame in script.on_subscribe {
                ws.send(Message::Text(frame)).await.expect("send");
            }
        }

        while let Some(Ok(_)) = ws.next().await {}
    });

    let settings = LightstreamerSettings {
        url: format!("ws://{addr}/lightstreamer"),
        adapter_set: "ISSLIVE".into(),
        client_id: "test".into(),
    };
    (settings, handle)
}
