//! HttpChatTransport -- concrete [`ChatTransport`] over the chat API.
//!
//! Each turn is one `POST {api_base_url}{chat_path}` with a JSON
//! [`TurnRequest`] body. A 2xx response carries the full transcript as a
//! [`TurnResponse`]; any other status is surfaced as
//! [`TransportError::Api`] without reading further into the body.

use std::time::Duration;

use chatline_core::transport::ChatTransport;
use chatline_types::chat::{ConversationId, TurnRequest, TurnResponse};
use chatline_types::config::ClientConfig;
use chatline_types::error::TransportError;

/// reqwest-backed chat API client.
pub struct HttpChatTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatTransport {
    /// Build a transport for the endpoint and timeout in `config`.
    ///
    /// Without `request_timeout_secs` requests wait as long as the server takes.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.chat_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpChatTransport {
    async fn send_turn(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<TurnResponse, TransportError> {
        let body = TurnRequest {
            user_id: user_id.to_string(),
            message: message.to_string(),
            conversation_id: conversation_id.cloned(),
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            conversation_id = ?conversation_id,
            "Sending chat turn"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %error_body, "Chat API rejected turn");
            return Err(TransportError::Api {
                status: status.as_u16(),
            });
        }

        let turn: TurnResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        tracing::debug!(
            conversation_id = %turn.conversation_id,
            messages = turn.messages.len(),
            "Chat turn completed"
        );
        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use chatline_types::chat::{Message, Role};

    use super::*;

    type Seen = Arc<Mutex<Vec<TurnRequest>>>;

    async fn echo_handler(State(seen): State<Seen>, Json(req): Json<TurnRequest>) -> Json<serde_json::Value> {
        seen.lock().unwrap().push(req.clone());
        let id = match req.conversation_id {
            Some(id) => serde_json::to_value(id).unwrap(),
            None => serde_json::json!(7),
        };
        Json(serde_json::json!({
            "conversation_id": id,
            "messages": [
                {"role": "user", "content": req.message, "timestamp": "2024-05-01T10:00:00"},
                {"role": "ai", "content": format!("echo: {}", req.message), "timestamp": "2024-05-01T10:00:01"}
            ]
        }))
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn transport_for(base_url: String) -> HttpChatTransport {
        let config = ClientConfig {
            api_base_url: base_url,
            request_timeout_secs: Some(5),
            ..ClientConfig::default()
        };
        HttpChatTransport::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_new_conversation_round_trip() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/api/chat", post(echo_handler))
            .with_state(seen.clone());
        let transport = transport_for(spawn(router).await);

        let turn = transport.send_turn("user-abc", "Hello", None).await.unwrap();

        assert_eq!(turn.conversation_id, ConversationId::Number(7));
        assert_eq!(turn.messages.len(), 2);
        assert_eq!(turn.messages[1].role, Role::Assistant);
        assert_eq!(turn.messages[1].content, "echo: Hello");

        let requests = seen.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![TurnRequest {
                user_id: "user-abc".to_string(),
                message: "Hello".to_string(),
                conversation_id: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_existing_conversation_id_is_forwarded() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/api/chat", post(echo_handler))
            .with_state(seen.clone());
        let transport = transport_for(spawn(router).await);
        let id = ConversationId::from("conv-9");

        let turn = transport.send_turn("user-abc", "More", Some(&id)).await.unwrap();

        assert_eq!(turn.conversation_id, id);
        assert_eq!(seen.lock().unwrap()[0].conversation_id, Some(id));
        assert_eq!(turn.messages[0], Message::user("More").with_timestamp("2024-05-01T10:00:00"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let router = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let transport = transport_for(spawn(router).await);

        let err = transport.send_turn("user-abc", "Hello", None).await.unwrap_err();
        assert_eq!(err, TransportError::Api { status: 500 });
        assert_eq!(err.to_string(), "API error");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let router = Router::new().route("/api/chat", post(|| async { "not json" }));
        let transport = transport_for(spawn(router).await);

        let err = transport.send_turn("user-abc", "Hello", None).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = transport_for(format!("http://{addr}"));
        let err = transport.send_turn("user-abc", "Hello", None).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = ClientConfig {
            api_base_url: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };
        let transport = HttpChatTransport::from_config(&config).unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:8000/api/chat");
    }
}
