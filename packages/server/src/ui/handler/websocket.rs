//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, MoveDescriptor},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::ConnectError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Omitted or empty means the server assigns a fresh id.
    pub client_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> ClientId (Domain Model)
    let client_id = match query.client_id.filter(|id| !id.is_empty()) {
        Some(raw) => match ClientId::try_from(raw.clone()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Invalid client_id '{}': {}", raw, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => ClientId::generate(),
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // register_client is called inside the UseCase
    match state
        .connect_participant_usecase
        .execute(client_id.clone(), tx)
        .await
    {
        Ok(()) => {
            tracing::info!("Client '{}' connected and registered", client_id);
            let failed_state = state.clone();
            let failed_client_id = client_id.clone();
            Ok(ws
                .on_failed_upgrade(move |e| {
                    tracing::warn!("Upgrade for '{}' failed: {}", failed_client_id, e);
                    tokio::spawn(async move {
                        failed_state
                            .disconnect_participant_usecase
                            .execute(&failed_client_id)
                            .await;
                    });
                })
                .on_upgrade(move |socket| handle_socket(socket, state, client_id, rx)))
        }
        Err(ConnectError::DuplicateClientId(_)) => {
            tracing::warn!(
                "Client with ID '{}' is already connected. Rejecting connection.",
                client_id
            );
            Err(StatusCode::CONFLICT)
        }
        Err(e @ ConnectError::RegistrationFailed(_)) => {
            tracing::error!("Failed to register '{}': {}", client_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that forwards queued frames from the rx channel to the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let requester = client_id.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error from '{}': {}", requester, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", requester, text.as_str());
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(message) => dispatch(&state_clone, &requester, message).await,
                        Err(e) => {
                            tracing::warn!("Dropping malformed frame from '{}': {}", requester, e);
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", requester);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push queued frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 切断時は必ず登録を解除する（セッションは残す）
    state
        .disconnect_participant_usecase
        .execute(&client_id)
        .await;
    tracing::info!("Client '{}' disconnected", client_id);
}

/// Route one inbound frame to its use case.
///
/// Rejected requests are logged only; the use cases already notified whoever needed it.
async fn dispatch(state: &AppState, requester: &ClientId, message: ClientMessage) {
    match message {
        ClientMessage::CreateSession => {
            state.create_session_usecase.execute(requester).await;
        }
        ClientMessage::JoinSession { session_id } => {
            // join-error is pushed by the UseCase
            let _ = state
                .join_session_usecase
                .execute(requester, &session_id)
                .await;
        }
        ClientMessage::SubmitMove { session_id, mv } => {
            let mv = MoveDescriptor::from(mv);
            if let Err(e) = state
                .submit_move_usecase
                .execute(requester, &session_id, &mv)
                .await
            {
                tracing::debug!("Move from '{}' ignored: {}", requester, e);
            }
        }
        ClientMessage::RequestRematch { session_id } => {
            if let Err(e) = state
                .request_rematch_usecase
                .execute(requester, &session_id)
                .await
            {
                tracing::debug!("Rematch request from '{}' ignored: {}", requester, e);
            }
        }
        ClientMessage::AcceptRematch { session_id } => {
            if let Err(e) = state
                .accept_rematch_usecase
                .execute(requester, &session_id)
                .await
            {
                tracing::debug!("Rematch accept from '{}' ignored: {}", requester, e);
            }
        }
    }
}
