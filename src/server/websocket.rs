use crate::assistant::{ AssistantGateway, AssistantReply, FallbackKind };
use crate::history::format_transcript;
use crate::models::websocket::{ ClientMessage, ServerMessage };
use crate::session::ChatSession;

use std::error::Error;
use std::fmt::Display;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use tokio::io::{ AsyncRead, AsyncWrite };
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use tokio_tungstenite::{ accept_async, WebSocketStream };
use tokio_tungstenite::tungstenite::protocol::Message;

use governor::{ RateLimiter, Quota };

use futures::{ Sink, SinkExt, StreamExt };
use log::{ debug, error, info, warn };

const MAX_MESSAGE_SIZE: usize = 64 * 1024;

pub async fn start_ws_server(
    addr: &str,
    gateway: Arc<AssistantGateway>,
    max_connections_per_second: u32
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await.map_err(|e|
        format!("Failed to bind WebSocket server to {}: {}", addr, e)
    )?;
    info!("WS server listening on: {}", addr);
    serve(listener, gateway, max_connections_per_second).await
}

/// Accepts connections on an already bound listener. Each connection becomes
/// one chat session.
pub async fn serve(
    listener: TcpListener,
    gateway: Arc<AssistantGateway>,
    max_connections_per_second: u32
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let per_second = NonZeroU32::new(max_connections_per_second).ok_or(
        "max connections per second must be at least 1"
    )?;
    let limiter = RateLimiter::direct(Quota::per_second(per_second));

    loop {
        let (stream, peer) = listener.accept().await?;

        if limiter.check().is_err() {
            warn!("Global connection rate limit exceeded for {}. Dropping connection.", peer);
            continue;
        }

        info!("Incoming connection from: {}", peer);
        let gateway = Arc::clone(&gateway);

        tokio::spawn(async move {
            match accept_async(stream).await {
                Ok(ws) => handle_connection(peer, ws, gateway).await,
                Err(e) => error!("Handshake failed for {}: {}", peer, e),
            }
        });
    }
}

async fn send_frame<S>(tx: &mut S, frame: &ServerMessage) -> Result<(), Box<dyn Error + Send + Sync>>
    where S: Sink<Message> + Unpin, S::Error: Display
{
    let json = serde_json::to_string(frame)?;
    tx.send(Message::Text(json)).await.map_err(|e| format!("Failed to send frame: {}", e))?;
    Ok(())
}

/// Resolves with the pending reply, or never when nothing is pending.
async fn next_reply(pending: &mut Option<oneshot::Receiver<AssistantReply>>) -> AssistantReply {
    match pending {
        Some(rx) =>
            match rx.await {
                Ok(reply) => reply,
                Err(_) => {
                    error!("Assistant task ended without a reply");
                    AssistantReply::fallback(FallbackKind::Generic)
                }
            }
        None => std::future::pending().await,
    }
}

pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    gateway: Arc<AssistantGateway>
)
    where S: AsyncRead + AsyncWrite + Unpin
{
    let (mut tx, mut rx) = websocket.split();
    let mut session = ChatSession::new();
    info!("Assigned session ID {} to {}", session.id(), peer);

    let greeting = &session.store().messages()[0];
    let hello = ServerMessage::Greeting {
        session_id: session.id().to_string(),
        content: greeting.text().to_string(),
        timestamp: greeting.timestamp(),
    };
    if let Err(e) = send_frame(&mut tx, &hello).await {
        error!("Error sending greeting to {}: {}", peer, e);
        return;
    }

    let mut pending: Option<oneshot::Receiver<AssistantReply>> = None;

    loop {
        tokio::select! {
            reply = next_reply(&mut pending) => {
                pending = None;
                let stored = session.complete(&reply);
                let frame = ServerMessage::Response {
                    content: stored.text().to_string(),
                    origin: reply.origin,
                    timestamp: stored.timestamp(),
                };
                if let Err(e) = send_frame(&mut tx, &frame).await {
                    error!("Error sending response to {}: {}", peer, e);
                    break;
                }
            }
            incoming = rx.next() => {
                let message = match incoming {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        match e {
                            | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                            | tokio_tungstenite::tungstenite::Error::Protocol(_)
                            | tokio_tungstenite::tungstenite::Error::Utf8 => {
                                info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                            }
                            _ => error!("Error receiving message from {}: {}", peer, e),
                        }
                        break;
                    }
                    None => break,
                };

                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    let frame = ServerMessage::Error { message: "Message too large".to_string() };
                    let _ = send_frame(&mut tx, &frame).await;
                    break;
                }

                let frame = match message {
                    Message::Text(text) =>
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Chat { content }) =>
                                match session.begin(&content) {
                                    Ok(utterance) => {
                                        let (reply_tx, reply_rx) = oneshot::channel();
                                        let gateway = Arc::clone(&gateway);
                                        // Runs to completion even if the socket closes first.
                                        tokio::spawn(async move {
                                            let reply = gateway.respond(&utterance).await;
                                            if reply_tx.send(reply).is_err() {
                                                debug!("Chat closed before reply arrived; discarding");
                                            }
                                        });
                                        pending = Some(reply_rx);
                                        ServerMessage::Processing
                                    }
                                    Err(e) => ServerMessage::Error { message: e.to_string() },
                                }
                            Ok(ClientMessage::History) =>
                                ServerMessage::History {
                                    messages: session.store().messages().to_vec(),
                                },
                            Err(e) => {
                                warn!("Failed to parse message from {}: {}", peer, e);
                                ServerMessage::Error {
                                    message: format!("Failed to parse message: {}", e),
                                }
                            }
                        }
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        break;
                    }
                    Message::Ping(data) => {
                        if tx.send(Message::Pong(data)).await.is_err() {
                            error!("Failed to send pong to {}", peer);
                            break;
                        }
                        continue;
                    }
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                        continue;
                    }
                    Message::Pong(_) | Message::Frame(_) => continue,
                };

                if let Err(e) = send_frame(&mut tx, &frame).await {
                    error!("Error sending frame to {}: {}", peer, e);
                    break;
                }
            }
        }
    }

    debug!("Transcript for session {}:\n{}", session.id(), format_transcript(session.store()));
    if session.in_flight() {
        info!("Session {} closed with a reply outstanding", session.id());
    }
    info!("WebSocket connection closed for {} (Session ID: {})", peer, session.id());
}
