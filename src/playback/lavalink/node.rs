use parking_lot::RwLock;
use reqwest::{Response, StatusCode};
use serenity::{
    all::{GuildId, UserId},
    async_trait,
};

use crate::{
    error::playback::NodeError,
    playback::{
        lavalink::model::{LoadResult, UpdatePlayer},
        node::AudioNode,
        track::Track,
    },
};

/// Source prefix applied to free-text queries.
pub const DEFAULT_SEARCH_PREFIX: &str = "ytsearch:";

/// REST client for a single Lavalink v4 node.
pub struct LavalinkNode {
    http: reqwest::Client,
    base_url: String,
    password: String,
    session_id: RwLock<Option<String>>,
}

impl LavalinkNode {
    /// Creates a client for the node at `base_url`, e.g. `http://localhost:2333`.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            password: password.into(),
            session_id: RwLock::new(None),
        }
    }

    /// Stores the session id received in the websocket `ready` op.
    pub fn set_session_id(&self, session_id: impl Into<String>) {
        *self.session_id.write() = Some(session_id.into());
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    /// URL of the node's event websocket, `/v4/websocket` on the same host.
    pub fn websocket_url(&self) -> String {
        let url = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.base_url.clone()
        };

        format!("{}/v4/websocket", url)
    }

    pub(super) fn password(&self) -> &str {
        &self.password
    }

    /// Fetches `GET /v4/info` to check that the node is reachable and the password accepted.
    pub async fn info(&self) -> Result<serde_json::Value, NodeError> {
        let response = self
            .http
            .get(format!("{}/v4/info", self.base_url))
            .header("Authorization", &self.password)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    pub(super) async fn load_tracks(&self, identifier: &str) -> Result<LoadResult, NodeError> {
        let response = self
            .http
            .get(format!("{}/v4/loadtracks", self.base_url))
            .query(&[("identifier", identifier)])
            .header("Authorization", &self.password)
            .send()
            .await?;

        Ok(Self::check(response).await?.json::<LoadResult>().await?)
    }

    pub(super) async fn update_player(
        &self,
        guild_id: GuildId,
        update: &UpdatePlayer,
    ) -> Result<(), NodeError> {
        let response = self
            .http
            .patch(self.player_url(guild_id)?)
            .header("Authorization", &self.password)
            .json(update)
            .send()
            .await?;

        Self::check(response).await?;

        Ok(())
    }

    pub(super) async fn destroy_player(&self, guild_id: GuildId) -> Result<(), NodeError> {
        let response = self
            .http
            .delete(self.player_url(guild_id)?)
            .header("Authorization", &self.password)
            .send()
            .await?;

        // Already gone on the node side.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await?;

        Ok(())
    }

    fn player_url(&self, guild_id: GuildId) -> Result<String, NodeError> {
        let session_id = self.session_id().ok_or(NodeError::NoSession)?;

        Ok(format!(
            "{}/v4/sessions/{}/players/{}",
            self.base_url, session_id, guild_id
        ))
    }

    async fn check(response: Response) -> Result<Response, NodeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(NodeError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl AudioNode for LavalinkNode {
    async fn search(&self, query: &str, requester: UserId) -> Result<Vec<Track>, NodeError> {
        let identifier = search_identifier(query);

        let tracks = self
            .load_tracks(&identifier)
            .await?
            .into_tracks()
            .map_err(NodeError::LoadFailed)?;

        Ok(tracks
            .into_iter()
            .map(|track| track.into_track(requester))
            .collect())
    }
}

/// Identifier for `/v4/loadtracks`: URLs and prefixed searches pass through,
/// anything else becomes a search with the default source.
pub fn search_identifier(query: &str) -> String {
    let query = query.trim();

    let is_url = query.starts_with("http://") || query.starts_with("https://");
    let has_prefix = query
        .split_once(':')
        .is_some_and(|(source, _)| source.ends_with("search") && !source.contains(' '));

    if is_url || has_prefix {
        query.to_string()
    } else {
        format!("{}{}", DEFAULT_SEARCH_PREFIX, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_queries_get_search_prefix() {
        assert_eq!(search_identifier("Artist Song"), "ytsearch:Artist Song");
        assert_eq!(search_identifier("  Artist: Song "), "ytsearch:Artist: Song");
    }

    #[test]
    fn urls_and_prefixed_queries_pass_through() {
        assert_eq!(
            search_identifier("https://www.youtube.com/watch?v=abc"),
            "https://www.youtube.com/watch?v=abc"
        );
        assert_eq!(search_identifier("scsearch:Song"), "scsearch:Song");
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let node = LavalinkNode::new(reqwest::Client::new(), "http://localhost:2333/", "pw");
        node.set_session_id("abc");

        assert_eq!(
            node.player_url(GuildId::new(5)).unwrap(),
            "http://localhost:2333/v4/sessions/abc/players/5"
        );
    }

    #[test]
    fn websocket_url_follows_scheme() {
        let plain = LavalinkNode::new(reqwest::Client::new(), "http://localhost:2333/", "pw");
        let tls = LavalinkNode::new(reqwest::Client::new(), "https://lava.example.com", "pw");

        assert_eq!(plain.websocket_url(), "ws://localhost:2333/v4/websocket");
        assert_eq!(tls.websocket_url(), "wss://lava.example.com/v4/websocket");
    }

    #[test]
    fn player_requests_need_session() {
        let node = LavalinkNode::new(reqwest::Client::new(), "http://localhost:2333", "pw");

        assert!(matches!(
            node.player_url(GuildId::new(5)),
            Err(NodeError::NoSession)
        ));
    }
}
