use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{
    errors::JsonApiError,
    events::{ChangeEvent, TopicFilter},
    extract::ApiQuery,
    metrics::WS_CLIENTS,
    state::ServerState,
};

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Comma separated topic names
    pub topics: Option<String>,
}

#[utoipa::path(
    get, path = "/ws", tag = "events",
    params(("topics" = Option<String>, Query, description = "Comma separated topics, e.g. feeding,store")),
    responses(
        (status = 101, description = "Switching Protocols"),
        (status = 400, description = "Unknown topic")
    )
)]
pub async fn handler(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<WsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    // topics are checked before the upgrade so a typo gets a plain 400
    let filter = match TopicFilter::parse(q.topics.as_deref().unwrap_or_default()) {
        Ok(f) => f,
        Err(msg) => return JsonApiError::bad_request(msg).into_response(),
    };
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };
    let rx = state.events.subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, rx, filter))
}

async fn stream_events(mut socket: WebSocket, mut rx: broadcast::Receiver<ChangeEvent>, filter: TopicFilter) {
    WS_CLIENTS.inc();
    info!(?filter, "ws_client_connected");
    loop {
        tokio::select! {
            ev = rx.recv() => match ev {
                Ok(ev) => {
                    if !filter.matches(ev.topic) { continue; }
                    let text = match serde_json::to_string(&ev) {
                        Ok(t) => t,
                        Err(e) => { warn!(error = %e, "ws_event_encode_failed"); continue; }
                    };
                    if socket.send(Message::Text(text)).await.is_err() { break; }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "ws_client_lagged");
                }
                Err(RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // 客户端消息无语义，忽略
                Some(Ok(other)) => debug!(?other, "ws_client_message_ignored"),
            },
        }
    }
    WS_CLIENTS.dec();
    info!("ws_client_disconnected");
}
