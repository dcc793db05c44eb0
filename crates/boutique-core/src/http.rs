//! Request/response contract with the storefront server.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    /// Any other verb, upper-cased.
    Other(String),
}

impl HttpMethod {
    /// Parse a form `method` attribute. Blank values mean `POST`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.as_str() {
            "" | "POST" => Self::Post,
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => Self::Other(upper),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Other(verb) => verb,
        }
    }

    /// `fetch` refuses a body on GET and HEAD.
    #[must_use]
    pub fn allows_body(&self) -> bool {
        !matches!(self, Self::Get | Self::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request the host must execute with `fetch`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest<B> {
    pub method: HttpMethod,
    /// Target as written in the page; may be relative or empty (current document).
    pub url: String,
    pub body: Option<B>,
}

/// Raw response handed back by the host. The status is informational only:
/// the server reports business failures in JSON bodies on 4xx statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

pub type FetchOutcome = std::result::Result<HttpResponse, TransportError>;

/// `GET /panier-count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CartCountReply {
    pub count: u64,
}

/// `POST /ajouter-au-panier`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AddToCartReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub panier_count: Option<u64>,
}

/// Reply of any admin form target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decode a JSON body, folding transport failures into the same error type.
pub fn decode<T: DeserializeOwned>(outcome: FetchOutcome) -> Result<T> {
    let response = outcome?;
    Ok(serde_json::from_str(&response.body)?)
}

/// Append URL-encoded `entries` to `url`, before any fragment.
#[must_use]
pub fn append_query(url: &str, entries: &[(String, String)]) -> String {
    if entries.is_empty() {
        return url.to_string();
    }
    let (base, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let query = entries
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    let separator = if !base.contains('?') {
        "?"
    } else if base.ends_with('?') || base.ends_with('&') {
        ""
    } else {
        "&"
    };
    format!("{base}{separator}{query}{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControllerError;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn method_parse_defaults_blank_to_post() {
        assert_eq!(HttpMethod::parse(""), HttpMethod::Post);
        assert_eq!(HttpMethod::parse("  "), HttpMethod::Post);
        assert_eq!(HttpMethod::parse("get"), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("Delete"), HttpMethod::Delete);
        assert_eq!(
            HttpMethod::parse("purge"),
            HttpMethod::Other("PURGE".to_string())
        );
        assert_eq!(HttpMethod::parse("purge").as_str(), "PURGE");
    }

    #[test]
    fn only_get_and_head_refuse_bodies() {
        assert!(!HttpMethod::Get.allows_body());
        assert!(!HttpMethod::Head.allows_body());
        assert!(HttpMethod::Post.allows_body());
        assert!(HttpMethod::Other("PURGE".into()).allows_body());
    }

    #[test]
    fn decode_reads_optional_fields() {
        let reply: AddToCartReply =
            decode(Ok(HttpResponse::ok(r#"{"success":true,"panier_count":7}"#))).unwrap();
        assert_eq!(
            reply,
            AddToCartReply {
                success: true,
                panier_count: Some(7)
            }
        );

        let reply: AdminReply = decode(Ok(HttpResponse::with_status(
            400,
            r#"{"success":false,"error":"Nom requis"}"#,
        )))
        .unwrap();
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("Nom requis"));

        let reply: AdminReply = decode(Ok(HttpResponse::ok("{}"))).unwrap();
        assert!(!reply.success);
    }

    #[test]
    fn decode_rejects_negative_count_and_html() {
        let err = decode::<CartCountReply>(Ok(HttpResponse::ok(r#"{"count":-1}"#))).unwrap_err();
        assert!(matches!(err, ControllerError::Decode(_)));
        let err = decode::<CartCountReply>(Ok(HttpResponse::ok("<!doctype html>"))).unwrap_err();
        assert!(matches!(err, ControllerError::Decode(_)));
    }

    #[test]
    fn decode_passes_transport_errors_through() {
        let err =
            decode::<CartCountReply>(Err(TransportError::new("Failed to fetch"))).unwrap_err();
        assert!(matches!(err, ControllerError::Transport(_)));
    }

    #[test]
    fn append_query_handles_existing_query_and_fragment() {
        let entries = pairs(&[("nom", "Crème solaire"), ("q", "a&b")]);
        assert_eq!(
            append_query("/admin/recherche", &entries),
            "/admin/recherche?nom=Cr%C3%A8me%20solaire&q=a%26b"
        );
        assert_eq!(
            append_query("/admin?page=2#top", &entries[..1]),
            "/admin?page=2&nom=Cr%C3%A8me%20solaire#top"
        );
        assert_eq!(append_query("/admin?", &entries[1..]), "/admin?q=a%26b");
        assert_eq!(append_query("/admin", &[]), "/admin");
    }
}
