// Twitter API clients. Small and synchronous like the rest of the program:
// one blocking HTTP client per handle, OAuth 1.0a signing on every request,
// no retries. `TwitterClient` talks to the v2 tweet endpoint and
// `MediaClient` is the separately-scoped handle for the v1.1 media upload
// host, both built from the same credential set.

use reqwest::blocking::{multipart, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::creds::Credentials;
use crate::error::{PostError, PostResult};
use crate::form::Draft;
use crate::oauth::OauthSigner;

const DEFAULT_API_URL: &str = "https://api.twitter.com";
const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com";

/// Uploads always use this label instead of the real filename.
const UPLOAD_FILENAME: &str = "uploaded_media";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body for `POST /2/tweets`. The `media` object is omitted entirely when no
/// media id was captured.
#[derive(Serialize, Debug)]
struct CreateTweetRequest {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<TweetMedia>,
}

#[derive(Serialize, Debug)]
struct TweetMedia {
    media_ids: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct CreateTweetResponse {
    data: PostedTweet,
}

/// What the platform echoes back for a created tweet.
#[derive(Deserialize, Debug, Clone)]
pub struct PostedTweet {
    pub id: String,
    pub text: String,
}

#[derive(Deserialize, Debug)]
struct MediaUploadResponse {
    media_id_string: String,
}

/// Error body shapes differ between API generations; take whatever human
/// readable message is present.
#[derive(Deserialize, Debug, Default)]
struct ApiErrorBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Vec<ApiErrorItem>>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorItem {
    #[serde(default)]
    message: Option<String>,
}

/// Authenticated handle for the v2 tweet endpoints.
#[derive(Debug)]
pub struct TwitterClient {
    http: Client,
    base_url: String,
    signer: OauthSigner,
}

impl TwitterClient {
    pub fn new(creds: &Credentials) -> PostResult<Self> {
        Self::with_base_url(creds, DEFAULT_API_URL)
    }

    pub fn with_base_url(creds: &Credentials, base_url: &str) -> PostResult<Self> {
        Ok(TwitterClient {
            http: build_http(creds)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: OauthSigner::new(creds),
        })
    }

    /// Create a tweet with the given text and optional media ids.
    pub fn create_tweet(
        &self,
        text: &str,
        media_ids: Option<Vec<String>>,
    ) -> PostResult<PostedTweet> {
        let url = format!("{}/2/tweets", self.base_url);
        let auth = self.signer.authorization_header("POST", &url, &[])?;
        let body = CreateTweetRequest {
            text: text.to_string(),
            media: media_ids.map(|ids| TweetMedia { media_ids: ids }),
        };

        debug!(has_media = body.media.is_some(), "creating tweet");
        let response = self
            .http
            .post(&url)
            .header("Authorization", auth)
            .json(&body)
            .send()?;

        let parsed: CreateTweetResponse = read_json(response)?;
        debug!(tweet_id = %parsed.data.id, "tweet created");
        Ok(parsed.data)
    }
}

/// Authenticated handle for the v1.1 media upload host.
pub struct MediaClient {
    http: Client,
    base_url: String,
    signer: OauthSigner,
}

impl MediaClient {
    pub fn new(creds: &Credentials) -> PostResult<Self> {
        Self::with_base_url(creds, DEFAULT_UPLOAD_URL)
    }

    pub fn with_base_url(creds: &Credentials, base_url: &str) -> PostResult<Self> {
        Ok(MediaClient {
            http: build_http(creds)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: OauthSigner::new(creds),
        })
    }

    /// Read the file at `path` and upload it, returning the assigned media
    /// id.
    pub fn upload_file(&self, path: &std::path::Path) -> PostResult<String> {
        let bytes = std::fs::read(path)?;
        self.upload(bytes)
    }

    /// Upload raw image bytes under the fixed placeholder filename.
    pub fn upload(&self, bytes: Vec<u8>) -> PostResult<String> {
        let url = format!("{}/1.1/media/upload.json", self.base_url);
        let auth = self.signer.authorization_header("POST", &url, &[])?;

        debug!(size = bytes.len(), "uploading media");
        let part = multipart::Part::bytes(bytes)
            .file_name(UPLOAD_FILENAME)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("media", part);

        let response = self
            .http
            .post(&url)
            .header("Authorization", auth)
            .multipart(form)
            .send()?;

        let parsed: MediaUploadResponse = read_json(response)?;
        debug!(media_id = %parsed.media_id_string, "media uploaded");
        Ok(parsed.media_id_string)
    }
}

/// Run one full submit action: upload media when the draft asks for it, then
/// create the tweet. An upload failure aborts before the tweet is created.
pub fn publish(
    api: &TwitterClient,
    media: &MediaClient,
    draft: &Draft,
) -> PostResult<PostedTweet> {
    let media_id = match draft.media_to_upload() {
        Some(path) => Some(media.upload_file(path)?),
        None => None,
    };
    api.create_tweet(&draft.text, media_id.map(|id| vec![id]))
}

fn build_http(creds: &Credentials) -> PostResult<Client> {
    if creds.is_empty() {
        return Err(PostError::AuthUnavailable);
    }
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("tweetpost-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PostError::Auth(e.to_string()))
}

/// Parse a success body, or map a non-success status to the platform error
/// class with whatever message the body carries.
fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> PostResult<T> {
    let status = response.status();
    let bytes = response.bytes()?;

    if status.is_success() {
        return serde_json::from_slice(&bytes)
            .map_err(|e| PostError::Unexpected(format!("unexpected response body: {e}")));
    }

    let body: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
    let message = body
        .detail
        .or(body.title)
        .or(body.error)
        .or_else(|| {
            body.errors
                .and_then(|items| items.into_iter().find_map(|item| item.message))
        })
        .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());

    warn!(status = status.as_u16(), %message, "platform API error");
    Err(PostError::Api(format!("{} {}", status.as_u16(), message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_creds() -> Credentials {
        Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        }
    }

    fn oauth_header() -> Matcher {
        Matcher::Regex("^OAuth ".into())
    }

    #[test]
    fn test_create_tweet_without_media_omits_media_field() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2/tweets")
            .match_header("authorization", oauth_header())
            .match_body(Matcher::Json(serde_json::json!({"text": "Hello world"})))
            .with_status(201)
            .with_body(r#"{"data":{"id":"1234567890","text":"Hello world"}}"#)
            .create();

        let client = TwitterClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let posted = client.create_tweet("Hello world", None).unwrap();

        mock.assert();
        assert_eq!(posted.id, "1234567890");
        assert_eq!(posted.text, "Hello world");
    }

    #[test]
    fn test_create_tweet_with_media_ids() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2/tweets")
            .match_body(Matcher::Json(serde_json::json!({
                "text": "with pic",
                "media": {"media_ids": ["mid-1"]}
            })))
            .with_status(201)
            .with_body(r#"{"data":{"id":"42","text":"with pic"}}"#)
            .create();

        let client = TwitterClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let posted = client
            .create_tweet("with pic", Some(vec!["mid-1".into()]))
            .unwrap();

        mock.assert();
        assert_eq!(posted.id, "42");
    }

    #[test]
    fn test_create_tweet_empty_text_is_sent() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2/tweets")
            .match_body(Matcher::Json(serde_json::json!({"text": ""})))
            .with_status(201)
            .with_body(r#"{"data":{"id":"7","text":""}}"#)
            .create();

        let client = TwitterClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let posted = client.create_tweet("", None).unwrap();

        mock.assert();
        assert_eq!(posted.text, "");
    }

    #[test]
    fn test_api_error_maps_to_platform_error_class() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/2/tweets")
            .with_status(403)
            .with_body(r#"{"title":"Forbidden","detail":"You are not allowed to do this"}"#)
            .create();

        let client = TwitterClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let err = client.create_tweet("nope", None).unwrap_err();

        assert!(matches!(err, PostError::Api(_)));
        let shown = err.to_string();
        assert!(shown.contains("Twitter API error"));
        assert!(shown.contains("You are not allowed to do this"));
    }

    #[test]
    fn test_upload_returns_media_id() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/1.1/media/upload.json")
            .match_header("authorization", oauth_header())
            .with_status(200)
            .with_body(r#"{"media_id":710511363345354753,"media_id_string":"710511363345354753"}"#)
            .create();

        let client = MediaClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let media_id = client.upload(vec![0xFF, 0xD8, 0xFF]).unwrap();

        mock.assert();
        assert_eq!(media_id, "710511363345354753");
    }

    #[test]
    fn test_upload_error_uses_v1_error_shape() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/1.1/media/upload.json")
            .with_status(400)
            .with_body(r#"{"errors":[{"code":44,"message":"media type unrecognized"}]}"#)
            .create();

        let client = MediaClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let err = client.upload(vec![1, 2, 3]).unwrap_err();

        assert!(matches!(err, PostError::Api(_)));
        assert!(err.to_string().contains("media type unrecognized"));
    }

    #[test]
    fn test_publish_upload_failure_skips_tweet_creation() {
        let mut upload_server = mockito::Server::new();
        upload_server
            .mock("POST", "/1.1/media/upload.json")
            .with_status(400)
            .with_body(r#"{"errors":[{"message":"bad media"}]}"#)
            .create();

        let mut api_server = mockito::Server::new();
        let create_mock = api_server.mock("POST", "/2/tweets").expect(0).create();

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not really a png").unwrap();

        let api = TwitterClient::with_base_url(&test_creds(), &api_server.url()).unwrap();
        let media = MediaClient::with_base_url(&test_creds(), &upload_server.url()).unwrap();
        let draft = Draft {
            text: "pic tweet".into(),
            include_media: true,
            image: Some(file.path().to_path_buf()),
        };

        let err = publish(&api, &media, &draft).unwrap_err();
        assert!(matches!(err, PostError::Api(_)));
        create_mock.assert();
    }

    #[test]
    fn test_publish_media_unchecked_sends_no_media() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/2/tweets")
            .match_body(Matcher::Json(serde_json::json!({"text": "plain"})))
            .with_status(201)
            .with_body(r#"{"data":{"id":"9","text":"plain"}}"#)
            .create();

        let api = TwitterClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let media = MediaClient::with_base_url(&test_creds(), &server.url()).unwrap();
        // Leftover picked file from an earlier attempt; media unchecked now.
        let draft = Draft {
            text: "plain".into(),
            include_media: false,
            image: Some("leftover.png".into()),
        };

        let posted = publish(&api, &media, &draft).unwrap();
        mock.assert();
        assert_eq!(posted.id, "9");
    }

    #[test]
    fn test_publish_full_flow_with_media() {
        let mut server = mockito::Server::new();
        let upload_mock = server
            .mock("POST", "/1.1/media/upload.json")
            .with_status(200)
            .with_body(r#"{"media_id_string":"555"}"#)
            .create();
        let create_mock = server
            .mock("POST", "/2/tweets")
            .match_body(Matcher::Json(serde_json::json!({
                "text": "look at this",
                "media": {"media_ids": ["555"]}
            })))
            .with_status(201)
            .with_body(r#"{"data":{"id":"10","text":"look at this"}}"#)
            .create();

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"\x89PNG").unwrap();

        let api = TwitterClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let media = MediaClient::with_base_url(&test_creds(), &server.url()).unwrap();
        let draft = Draft {
            text: "look at this".into(),
            include_media: true,
            image: Some(file.path().to_path_buf()),
        };

        let posted = publish(&api, &media, &draft).unwrap();
        upload_mock.assert();
        create_mock.assert();
        assert_eq!(posted.id, "10");
    }

    #[test]
    fn test_empty_credentials_give_no_handle() {
        let err = TwitterClient::new(&Credentials::default()).unwrap_err();
        assert!(matches!(err, PostError::AuthUnavailable));
        assert_eq!(err.to_string(), "Twitter authentication failed");
    }
}
