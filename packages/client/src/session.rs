//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use sente_server::infrastructure::dto::websocket::ServerMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};
use url::Url;

use crate::{
    command::{Command, HELP},
    domain::GameTracker,
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run one WebSocket connection until the user quits or the connection drops
///
/// # Returns
///
/// * `Ok(())` - The user quit (or stdin closed)
/// * `Err(ClientError)` - The connection was refused or lost
pub async fn run_client_session(
    url: &str,
    tracker: &mut GameTracker,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    // Reuse the identity the server confirmed so the sessions stay ours
    let url = connect_url(url, tracker.client_id.as_deref())?;

    let (ws_stream, _response) = connect_async(&url)
        .await
        .map_err(|e| classify_connect_error(e, tracker.client_id.as_deref()))?;
    tracing::info!("Connected to {}", url);
    if let Some(session_id) = &tracker.session_id {
        println!("\nReconnected. Current session: {}", session_id);
    }

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let output = match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(message) => {
                            tracker.apply(&message);
                            MessageFormatter::format_server_message(&message, tracker)
                        }
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", output);
                    redisplay_prompt();
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
                Some(Ok(_)) => {}
            },
            line = input_rx.recv() => {
                // Readline thread ended (Ctrl+C / Ctrl+D)
                let Some(line) = line else {
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };

                let command = match Command::parse(&line) {
                    Ok(Command::Quit) => {
                        write.send(Message::Close(None)).await.ok();
                        return Ok(());
                    }
                    Ok(Command::Help) => {
                        println!("{}", HELP);
                        redisplay_prompt();
                        continue;
                    }
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        redisplay_prompt();
                        continue;
                    }
                };

                let message = match command.to_client_message(tracker.session_id.as_deref()) {
                    Ok(Some(message)) => message,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{}", e);
                        redisplay_prompt();
                        continue;
                    }
                };

                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::Text(json.into())).await {
                    tracing::warn!("Failed to send message: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}

/// Build the WebSocket URL, appending `client_id` as an encoded query pair
fn connect_url(base: &str, client_id: Option<&str>) -> Result<String, ClientError> {
    let mut url = Url::parse(base)
        .map_err(|e| ClientError::ConnectionError(format!("invalid URL '{}': {}", base, e)))?;
    if let Some(client_id) = client_id {
        url.query_pairs_mut().append_pair("client_id", client_id);
    }
    Ok(url.into())
}

fn classify_connect_error(error: tungstenite::Error, client_id: Option<&str>) -> ClientError {
    if let tungstenite::Error::Http(response) = &error
        && let Some(rejected) = classify_rejection(response.status().as_u16(), client_id)
    {
        return rejected;
    }
    ClientError::ConnectionError(error.to_string())
}

/// Map the handshake status the server uses to refuse an identity
fn classify_rejection(status: u16, client_id: Option<&str>) -> Option<ClientError> {
    let client_id = client_id.unwrap_or_default().to_string();
    match status {
        409 => Some(ClientError::DuplicateClientId(client_id)),
        400 => Some(ClientError::InvalidClientId(client_id)),
        _ => None,
    }
}
