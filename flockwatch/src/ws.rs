//! WebSocket side of the scanner channel: connect, speak just enough Socket.IO
//! to stay joined, and forward the subscribed events in arrival order.

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use anyhow::{bail, Context};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async, connect_async_tls_with_config, tungstenite::Message, Connector,
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::types::ChannelEvent;
use crate::wire::{self, Frame};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Turn whatever the user typed into a Socket.IO websocket endpoint.
/// `http://host:5000` becomes `ws://host:5000/socket.io/?EIO=4&transport=websocket`.
pub fn socket_io_endpoint(input: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(input).with_context(|| format!("invalid URL {input:?}"))?;
    let scheme = match url.scheme() {
        "ws" | "http" => "ws",
        "wss" | "https" => "wss",
        other => bail!("unsupported scheme {other:?} (expected ws, wss, http or https)"),
    };
    if url.scheme() != scheme && url.set_scheme(scheme).is_err() {
        bail!("cannot switch {input:?} to {scheme}");
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path("/socket.io/");
    }
    if !url.query_pairs().any(|(k, _)| k == "EIO") {
        url.query_pairs_mut()
            .append_pair("EIO", "4")
            .append_pair("transport", "websocket");
    }
    Ok(url)
}

// Connect to the scanner and return the WS stream. Without a CA file, wss
// verifies against the bundled webpki roots.
pub async fn connect(url: &str, tls_ca: Option<&str>) -> anyhow::Result<WsStream> {
    let endpoint = socket_io_endpoint(url)?;
    info!(%endpoint, "connecting");
    let ws = match tls_ca {
        Some(ca) if endpoint.scheme() == "wss" => {
            let cfg = client_config_with_ca(Path::new(ca))?;
            let (ws, _) = connect_async_tls_with_config(
                endpoint.as_str(),
                None,
                false,
                Some(Connector::Rustls(Arc::new(cfg))),
            )
            .await
            .with_context(|| format!("connecting to {endpoint}"))?;
            ws
        }
        _ => {
            let (ws, _) = connect_async(endpoint.as_str())
                .await
                .with_context(|| format!("connecting to {endpoint}"))?;
            ws
        }
    };
    Ok(ws)
}

fn client_config_with_ca(path: &Path) -> anyhow::Result<rustls::ClientConfig> {
    let file = File::open(path).with_context(|| format!("opening CA file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut roots = rustls::RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert.with_context(|| format!("reading PEM from {}", path.display()))?;
        roots.add(cert).context("adding CA certificate")?;
    }
    if roots.is_empty() {
        bail!("no certificates found in {}", path.display());
    }
    Ok(rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth())
}

/// Read frames until the server goes away or the receiver is dropped.
/// Keepalive and namespace join are answered here; nothing else is ever sent.
pub async fn pump<S>(
    mut ws: WebSocketStream<S>,
    tx: mpsc::Sender<ChannelEvent>,
) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(msg) = ws.next().await {
        let text = match msg.context("websocket read")? {
            Message::Text(t) => t,
            Message::Close(_) => break,
            _ => continue,
        };
        let frame = match wire::decode(&text) {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, frame = %text, "undecodable frame");
                continue;
            }
        };
        let event = match frame {
            Frame::Open(hs) => {
                debug!(sid = %hs.sid, ping_interval = hs.ping_interval, "engine.io open");
                ws.send(Message::Text(wire::CONNECT_DEFAULT_NS.into()))
                    .await
                    .context("joining namespace")?;
                continue;
            }
            Frame::Ping => {
                ws.send(Message::Text(wire::PONG.into()))
                    .await
                    .context("sending pong")?;
                continue;
            }
            Frame::Connected => ChannelEvent::Connect,
            Frame::Event { name, data } => match ChannelEvent::from_named(&name, data) {
                Ok(Some(ev)) => ev,
                Ok(None) => {
                    debug!(%name, "ignoring unsubscribed event");
                    continue;
                }
                Err(e) => {
                    warn!(%name, error = %e, "bad event payload");
                    continue;
                }
            },
            Frame::ConnectError(msg) => {
                warn!(%msg, "namespace connect refused");
                break;
            }
            Frame::Close | Frame::Disconnected => break,
            Frame::Pong | Frame::Noop | Frame::Unsupported(_) => continue,
        };
        if tx.send(event).await.is_err() {
            // dashboard is gone
            break;
        }
    }
    Ok(())
}

/// Spawn the reader on its own task; the channel closes when it ends.
pub fn spawn_pump(ws: WsStream, tx: mpsc::Sender<ChannelEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = pump(ws, tx).await {
            warn!(error = %e, "scanner channel failed");
        }
    })
}
