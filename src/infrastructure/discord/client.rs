//! Discord API HTTP client.

use std::fmt::Write as _;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::ErrorResponse;
use crate::domain::entities::{AuthToken, Channel, ChannelId, Guild, GuildId, UserId};
use crate::domain::errors::{MemberError, TransportError};
use crate::domain::ports::{MemberPayload, MemberPort, ModifyMemberParams, RequestOptions};

/// Default Discord REST endpoint.
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/linuxmobile/oxicord, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);
const AUDIT_LOG_REASON_HEADER: &str = "X-Audit-Log-Reason";
const DEFAULT_RETRY_AFTER_MS: u64 = 5000;

/// Discord REST client for guild members.
pub struct DiscordClient {
    client: Client,
    base_url: String,
    token: AuthToken,
}

impl DiscordClient {
    /// Creates new client with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(token: AuthToken) -> Result<Self, MemberError> {
        Self::with_base_url(token, DISCORD_API_BASE)
    }

    /// Creates client with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(token: AuthToken, base_url: impl Into<String>) -> Result<Self, MemberError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str, options: &RequestOptions) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header(header::AUTHORIZATION, self.token.authorization());

        if let Some(reason) = options.audit_log_reason() {
            builder = builder.header(AUDIT_LOG_REASON_HEADER, encode_audit_log_reason(reason));
        }

        builder
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        options: &RequestOptions,
        not_found: MemberError,
    ) -> Result<Response, MemberError> {
        options
            .guard(async {
                let response = match builder.send().await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!(error = %e, "Failed to reach Discord API");
                        return Err(MemberError::from(transport_error(&e)));
                    }
                };

                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }

                let body = response.json::<ErrorResponse>().await.ok();
                let error = classify(status, body, not_found);
                warn!(%status, error = %error, "Discord API request failed");
                Err(error)
            })
            .await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
        not_found: MemberError,
    ) -> Result<T, MemberError> {
        let response = self
            .send(self.request(Method::GET, path, options), options, not_found)
            .await?;

        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, path, "Failed to parse Discord response");
            TransportError::unexpected(format!("failed to parse response: {e}")).into()
        })
    }

    /// Fetches a guild together with its role table.
    ///
    /// # Errors
    /// Returns a transport error if the request fails.
    pub async fn fetch_guild(
        &self,
        guild_id: GuildId,
        options: &RequestOptions,
    ) -> Result<Guild, MemberError> {
        debug!(%guild_id, "Fetching guild");
        let not_found: MemberError =
            TransportError::unexpected(format!("unknown guild {guild_id}")).into();
        self.fetch(&format!("/guilds/{guild_id}"), options, not_found)
            .await
    }

    /// Fetches a channel together with its permission overwrites.
    ///
    /// # Errors
    /// Returns a transport error if the request fails.
    pub async fn fetch_channel(
        &self,
        channel_id: ChannelId,
        options: &RequestOptions,
    ) -> Result<Channel, MemberError> {
        debug!(%channel_id, "Fetching channel");
        let not_found: MemberError =
            TransportError::unexpected(format!("unknown channel {channel_id}")).into();
        self.fetch(&format!("/channels/{channel_id}"), options, not_found)
            .await
    }
}

#[async_trait]
impl MemberPort for DiscordClient {
    async fn fetch_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        options: &RequestOptions,
    ) -> Result<MemberPayload, MemberError> {
        debug!(%guild_id, %user_id, "Fetching guild member");

        let payload: MemberPayload = self
            .fetch(
                &member_path(guild_id, user_id),
                options,
                MemberError::not_found(guild_id, user_id),
            )
            .await?;

        debug!(%guild_id, %user_id, roles = payload.roles.len(), "Fetched guild member");
        Ok(payload)
    }

    async fn patch_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        params: &ModifyMemberParams,
        options: &RequestOptions,
    ) -> Result<ModifyMemberParams, MemberError> {
        debug!(%guild_id, %user_id, "Patching guild member");

        let builder = self
            .request(Method::PATCH, &member_path(guild_id, user_id), options)
            .json(params);
        self.send(builder, options, MemberError::not_found(guild_id, user_id))
            .await?;

        Ok(params.clone())
    }

    async fn remove_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        options: &RequestOptions,
    ) -> Result<(), MemberError> {
        debug!(%guild_id, %user_id, "Removing guild member");

        let builder = self.request(Method::DELETE, &member_path(guild_id, user_id), options);
        self.send(builder, options, MemberError::not_found(guild_id, user_id))
            .await?;

        Ok(())
    }
}

fn member_path(guild_id: GuildId, user_id: UserId) -> String {
    format!("/guilds/{guild_id}/members/{user_id}")
}

fn transport_error(error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::TimedOut
    } else if error.is_connect() {
        TransportError::network("failed to connect to Discord")
    } else {
        TransportError::network(error.to_string())
    }
}

/// Maps a non-success status to a member error.
fn classify(status: StatusCode, body: Option<ErrorResponse>, not_found: MemberError) -> MemberError {
    let body = body.unwrap_or_default();
    let message = if body.message.is_empty() {
        format!("HTTP {status}")
    } else {
        body.message.clone()
    };

    match status {
        StatusCode::NOT_FOUND => not_found,
        StatusCode::UNAUTHORIZED => TransportError::Unauthorized.into(),
        StatusCode::FORBIDDEN => TransportError::forbidden(message).into(),
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited {
            retry_after_ms: body.retry_after_ms().unwrap_or(DEFAULT_RETRY_AFTER_MS),
        }
        .into(),
        s if s.is_server_error() => {
            TransportError::network(format!("Discord API is temporarily unavailable: {message}"))
                .into()
        }
        _ => TransportError::unexpected(format!("{status} - {message}")).into(),
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_audit_log_reason(reason: &str) -> String {
    let mut encoded = String::with_capacity(reason.len());
    for byte in reason.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn token() -> AuthToken {
        AuthToken::new_unchecked("MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY")
    }

    fn unknown_member() -> MemberError {
        MemberError::not_found(GuildId(1), UserId(2))
    }

    #[test]
    fn test_client_creation() {
        let client = DiscordClient::new(token());
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = DiscordClient::with_base_url(token(), "http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_not_found_uses_caller_error() {
        let error = classify(StatusCode::NOT_FOUND, None, unknown_member());
        assert_eq!(error, unknown_member());
    }

    #[test_case(StatusCode::UNAUTHORIZED, TransportError::Unauthorized ; "unauthorized")]
    #[test_case(StatusCode::FORBIDDEN, TransportError::forbidden("HTTP 403 Forbidden") ; "forbidden")]
    #[test_case(StatusCode::TOO_MANY_REQUESTS, TransportError::RateLimited { retry_after_ms: 5000 } ; "rate_limited_default")]
    #[test_case(StatusCode::BAD_GATEWAY, TransportError::network("Discord API is temporarily unavailable: HTTP 502 Bad Gateway") ; "server_error")]
    #[test_case(StatusCode::BAD_REQUEST, TransportError::unexpected("400 Bad Request - HTTP 400 Bad Request") ; "bad_request")]
    fn test_classify_without_body(status: StatusCode, expected: TransportError) {
        assert_eq!(
            classify(status, None, unknown_member()),
            MemberError::Transport(expected)
        );
    }

    #[test]
    fn test_classify_rate_limit_uses_body() {
        let body = ErrorResponse {
            message: "You are being rate limited.".to_string(),
            code: 0,
            retry_after: Some(1.5),
        };

        assert_eq!(
            classify(StatusCode::TOO_MANY_REQUESTS, Some(body), unknown_member()),
            MemberError::Transport(TransportError::RateLimited {
                retry_after_ms: 1500
            })
        );
    }

    #[test]
    fn test_audit_log_reason_encoding() {
        assert_eq!(encode_audit_log_reason("spam bot"), "spam%20bot");
        assert_eq!(encode_audit_log_reason("raid-1_ok"), "raid-1_ok");
        assert_eq!(encode_audit_log_reason("é"), "%C3%A9");
    }
}
