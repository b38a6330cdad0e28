use contracts::Authorization;
use hyper::{header::AUTHORIZATION, HeaderMap};

/// Decides whether a username/password pair may write lists.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured username/password pair.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Read basic credentials from the `Authorization` header.
///
/// Anything other than a well formed `Basic <base64(username:password)>` value
/// results in an `Authorization` without basic credentials.
pub fn authorization_from_headers(headers: &HeaderMap) -> Authorization {
    let header = match headers.get(AUTHORIZATION) {
        Some(header) => header,
        None => return Authorization::none(),
    };

    match header.to_str().ok().and_then(parse_basic) {
        Some((username, password)) => Authorization::basic(username, password),
        None => {
            warn!("ignoring malformed 'Authorization' header");
            Authorization::none()
        }
    }
}

fn parse_basic(value: &str) -> Option<(String, String)> {
    let mut parts = value.trim().splitn(2, ' ');
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = base64::decode(parts.next()?.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_owned(), password.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn basic_header_test() {
        let value = format!("Basic {}", base64::encode("testuser:p455w0rd"));
        assert_eq!(
            authorization_from_headers(&headers_with(&value)),
            Authorization::basic("testuser".to_owned(), "p455w0rd".to_owned())
        );

        // only the first colon separates username from password
        let value = format!("basic {}", base64::encode("user:pa:ss"));
        assert_eq!(
            authorization_from_headers(&headers_with(&value)),
            Authorization::basic("user".to_owned(), "pa:ss".to_owned())
        );
    }

    #[test]
    fn malformed_headers_test() {
        let invalids = [
            "Bearer abc.def.ghi".to_owned(),
            "Basic".to_owned(),
            "Basic not base64!".to_owned(),
            format!("Basic {}", base64::encode("no colon")),
        ];
        for invalid in &invalids {
            assert_eq!(
                authorization_from_headers(&headers_with(invalid)),
                Authorization::none(),
                "{}",
                invalid
            );
        }

        assert_eq!(
            authorization_from_headers(&HeaderMap::new()),
            Authorization::none()
        );
    }

    #[test]
    fn static_credentials_test() {
        let credentials = StaticCredentials::new("testuser".to_owned(), "p455w0rd".to_owned());

        assert!(credentials.verify("testuser", "p455w0rd"));
        assert!(!credentials.verify("testuser", "password"));
        assert!(!credentials.verify("TESTUSER", "p455w0rd"));
        assert!(!credentials.verify("", ""));
    }
}
