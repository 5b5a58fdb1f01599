use std::time::Duration;

use travel_core::{MirrorError, MirrorRow, RemoteMirror};

use crate::config::MirrorConfig;

const TABLE_PATH: &str = "rest/v1/user_cities";
const USER_AGENT: &str = "travel-map-cli/0.1";
const UPSERT_CONFLICT_COLUMNS: &str = "user_id,city_id";

/// PostgREST-style mirror of the `user_cities` table.
pub struct HttpMirror {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl HttpMirror {
    pub fn new(config: &MirrorConfig) -> Result<Self, MirrorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| MirrorError::BuildClient(Box::new(error)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{TABLE_PATH}", self.base_url)
    }

    fn authorized(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        request
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<(), MirrorError> {
        let response = request
            .send()
            .map_err(|error| MirrorError::Transport(Box::new(error)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|error| MirrorError::Transport(Box::new(error)))?;
        check_status(status, &body)
    }
}

impl RemoteMirror for HttpMirror {
    /// Upserts every row first and only then prunes rows the collection no
    /// longer has, so a failed request never leaves the remote copy empty.
    fn replace_all(&self, user_id: &str, rows: &[MirrorRow]) -> Result<(), MirrorError> {
        if !rows.is_empty() {
            let body = serde_json::to_vec(rows).map_err(MirrorError::Encode)?;
            let upsert = self
                .client
                .post(self.table_url())
                .query(&[("on_conflict", UPSERT_CONFLICT_COLUMNS)])
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .body(body);
            self.send(self.authorized(upsert))?;
        }

        let prune = self
            .client
            .delete(self.table_url())
            .query(&stale_row_filter(user_id, rows));
        self.send(self.authorized(prune))
    }
}

/// PostgREST filter selecting the user's rows whose `city_id` is not in
/// `rows`; with no rows it selects all of them.
pub fn stale_row_filter(user_id: &str, rows: &[MirrorRow]) -> Vec<(&'static str, String)> {
    let mut filter = vec![("user_id", format!("eq.{user_id}"))];
    if !rows.is_empty() {
        let ids: Vec<String> = rows.iter().map(|row| quote_value(&row.city_id)).collect();
        filter.push(("city_id", format!("not.in.({})", ids.join(","))));
    }
    filter
}

fn quote_value(raw: &str) -> String {
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn check_status(status: u16, body: &str) -> Result<(), MirrorError> {
    if (200..=299).contains(&status) {
        return Ok(());
    }

    let message = extract_error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
    Err(MirrorError::Http { status, message })
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_status_accepts_2xx() {
        assert!(check_status(200, "").is_ok());
        assert!(check_status(204, "").is_ok());
    }

    #[test]
    fn mirror_status_prefers_api_message() {
        let err = check_status(401, r#"{"message":"Invalid API key"}"#).expect_err("401 fails");

        assert!(matches!(
            err,
            MirrorError::Http { status: 401, ref message } if message == "Invalid API key"
        ));
    }

    #[test]
    fn mirror_status_falls_back_to_http_code() {
        let err = check_status(503, "upstream down").expect_err("503 fails");

        assert!(matches!(
            err,
            MirrorError::Http { status: 503, ref message } if message == "HTTP 503"
        ));
    }

    fn row(city_id: &str) -> MirrorRow {
        MirrorRow {
            user_id: "user-1".to_string(),
            city_id: city_id.to_string(),
            city_name: city_id.to_uppercase(),
            country: "France".to_string(),
            latitude: 48.0,
            longitude: 2.0,
            emoji: String::new(),
            visited: false,
            is_custom: false,
            importance: "major",
            population: None,
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn mirror_prune_filter_keeps_current_rows() {
        let filter = stale_row_filter("user-1", &[row("paris"), row("rome")]);

        assert_eq!(
            filter,
            vec![
                ("user_id", "eq.user-1".to_string()),
                ("city_id", r#"not.in.("paris","rome")"#.to_string()),
            ]
        );
    }

    #[test]
    fn mirror_prune_filter_without_rows_clears_user() {
        assert_eq!(
            stale_row_filter("user-1", &[]),
            vec![("user_id", "eq.user-1".to_string())]
        );
    }

    #[test]
    fn mirror_quotes_reserved_characters() {
        assert_eq!(quote_value(r#"a,b"c"#), r#""a,b\"c""#);
    }

    #[test]
    fn mirror_table_url_joins_base() {
        let mirror = HttpMirror::new(&MirrorConfig {
            base_url: "https://example.supabase.co".to_string(),
            api_key: "key".to_string(),
            user_id: "user-1".to_string(),
            timeout_secs: 5,
        })
        .expect("client should build");

        assert_eq!(
            mirror.table_url(),
            "https://example.supabase.co/rest/v1/user_cities"
        );
    }
}
