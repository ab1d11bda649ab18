use crate::config::ConnectionSettings;
use crate::domain::model::{FieldValue, Record, RemoteRecord};
use crate::domain::ports::TableClient;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// `TableClient` over the AirTable REST API, bound to one base and table.
pub struct AirtableClient {
    client: Client,
    endpoint: Url,
    base_key: String,
    table: String,
    api_key: String,
    typecast: bool,
}

#[derive(Serialize)]
struct WriteRequest<'a> {
    fields: &'a Record,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    typecast: bool,
}

#[derive(Deserialize)]
struct ListResponse {
    records: Vec<RemoteRecord>,
}

impl AirtableClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        let endpoint = Url::parse(&settings.endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(ImportError::InvalidConfigValueError {
                field: "endpoint".to_string(),
                value: settings.endpoint.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            base_key: settings.base_key.clone(),
            table: settings.table.clone(),
            api_key: settings.api_key.clone(),
            typecast: settings.typecast,
        })
    }

    /// `<endpoint>/<base>/<table>[/<record id>]`, each segment percent-encoded.
    fn table_url(&self, record_id: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.base_key).push(&self.table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        tracing::debug!("AirTable response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }

    async fn write(
        &self,
        method: Method,
        record_id: Option<&str>,
        record: &Record,
    ) -> Result<RemoteRecord> {
        let url = self.table_url(record_id);
        tracing::debug!("{} {}", method, url);

        let body = WriteRequest {
            fields: record,
            typecast: self.typecast,
        };
        self.send(self.client.request(method, url).json(&body)).await
    }

    /// First row whose `field` equals `value`, if any.
    pub async fn find_first(
        &self,
        field: &str,
        value: &FieldValue,
    ) -> Result<Option<RemoteRecord>> {
        let formula = match_formula(field, value);
        tracing::debug!("Looking up row with {}", formula);

        let request = self
            .client
            .get(self.table_url(None))
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")]);
        let listing: ListResponse = self.send(request).await?;

        Ok(listing.records.into_iter().next())
    }
}

#[async_trait]
impl TableClient for AirtableClient {
    async fn insert(&self, record: &Record) -> Result<RemoteRecord> {
        self.write(Method::POST, None, record).await
    }

    async fn update_by_field(
        &self,
        field: &str,
        value: &FieldValue,
        record: &Record,
    ) -> Result<Option<RemoteRecord>> {
        match self.find_first(field, value).await? {
            Some(existing) => Ok(Some(
                self.write(Method::PATCH, Some(existing.id.as_str()), record).await?,
            )),
            None => Ok(None),
        }
    }

    async fn replace_by_field(
        &self,
        field: &str,
        value: &FieldValue,
        record: &Record,
    ) -> Result<Option<RemoteRecord>> {
        match self.find_first(field, value).await? {
            Some(existing) => Ok(Some(
                self.write(Method::PUT, Some(existing.id.as_str()), record).await?,
            )),
            None => Ok(None),
        }
    }
}

/// Builds `{field}=value` for the `filterByFormula` query parameter.
pub fn match_formula(field: &str, value: &FieldValue) -> String {
    let literal = match value {
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Json(serde_json::Value::Bool(true)) => "TRUE()".to_string(),
        FieldValue::Json(serde_json::Value::Bool(false)) => "FALSE()".to_string(),
        FieldValue::Text(s) => quote_formula_string(s),
        other => quote_formula_string(&other.scalar_text().unwrap_or_else(|| {
            serde_json::to_string(other).unwrap_or_default()
        })),
    };
    format!("{{{}}}={}", field, literal)
}

fn quote_formula_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

// AirTable reports errors as {"error": {"type", "message"}} or {"error": "NOT_FOUND"}.
fn api_error(status: u16, body: &str) -> ImportError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let (error_type, message) = match error {
        Some(serde_json::Value::Object(obj)) => (
            obj.get("type").and_then(|t| t.as_str()).map(str::to_string),
            obj.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(body)
                .to_string(),
        ),
        Some(serde_json::Value::String(kind)) => (Some(kind.clone()), kind.clone()),
        _ => (None, body.to_string()),
    };

    ImportError::AirtableApi {
        status,
        error_type,
        message,
    }
}
