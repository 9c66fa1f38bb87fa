//! Per-request user inputs. Built fresh for every request and passed into the payload
//! functions; nothing about a visitor outlives the request.

use crate::dashboard::DEFAULT_LICENSE_TYPE;
use crate::quiz::QuizAnswers;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub license_type: String,
    pub zip_code: String,
    pub quiz: Option<QuizAnswers>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            license_type: DEFAULT_LICENSE_TYPE.to_string(),
            zip_code: String::new(),
            quiz: None,
        }
    }
}

impl SessionContext {
    /// Read `license_type` and `zip` from the query string of `path`.
    pub fn from_path(path: &str) -> Self {
        let mut session = Self::default();
        for (key, value) in query_pairs(path) {
            match key.as_str() {
                "license_type" if !value.is_empty() => session.license_type = value,
                "zip" | "zip_code" => session.zip_code = value,
                _ => {}
            }
        }
        session
    }

    pub fn with_quiz_body(mut self, body: &str) -> Result<Self, serde_json::Error> {
        self.quiz = Some(serde_json::from_str(body)?);
        Ok(self)
    }
}

fn query_pairs(path: &str) -> Vec<(String, String)> {
    let query = path.split_once('?').map_or("", |(_, query)| query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Decode one form-encoded component. `+` is a space; malformed escapes are kept literally.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_retail_and_empty_zip() {
        let session = SessionContext::from_path("/api/lookup");
        assert_eq!(session.license_type, "Retail");
        assert_eq!(session.zip_code, "");
    }

    #[test]
    fn reads_and_decodes_query_values() {
        let session = SessionContext::from_path("/api/lookup?license_type=Co-Located&zip=02118");
        assert_eq!(session.license_type, "Co-Located");
        assert_eq!(session.zip_code, "02118");

        let session = SessionContext::from_path("/api/lookup?license_type=Test%20Lab+X&zip=%30");
        assert_eq!(session.license_type, "Test Lab X");
        assert_eq!(session.zip_code, "0");

        let session = SessionContext::from_path("/api/lookup?license_type=Retail%2BMedical&zip=02118");
        assert_eq!(session.license_type, "Retail+Medical");
    }

    #[test]
    fn malformed_escape_is_kept() {
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz1"), "%zz1");
        assert_eq!(decode_component("%4"), "%4");
    }

    #[test]
    fn quiz_body_is_attached() {
        let session = SessionContext::default()
            .with_quiz_body(r#"{"name":"Ashlyn","state":"MA"}"#)
            .expect("body should parse");
        let quiz = session.quiz.expect("quiz answers");
        assert_eq!(quiz.name, "Ashlyn");
        assert_eq!(quiz.state, "MA");
    }
}
