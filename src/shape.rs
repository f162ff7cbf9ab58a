//! Post-processing of server results into the text returned to callers.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;
use crate::odoo::{CreateValues, CreatedIds, Record, TemporalFields, TemporalKind};

/// Key under which record URLs are attached.
pub const URL_KEY: &str = "_url";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text of a soft update failure.
pub const UPDATE_FAILED: &str = "Update operation failed";

/// Text of the record-not-found sentinel.
pub const RECORD_NOT_FOUND: &str = "Record not found";

/// Builds response payloads that point back at the server's web client.
#[derive(Debug, Clone)]
pub struct Shaper {
    base_url: String,
}

impl Shaper {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/odoo/<model>/<id>`
    pub fn record_url(&self, model: &str, id: impl Display) -> String {
        format!("{}/odoo/{model}/{id}", self.base_url)
    }

    /// Add [`URL_KEY`] to every record that has an `id`. A field already
    /// named `_url` is left alone.
    pub fn attach_urls(&self, model: &str, records: &mut [Record]) {
        for record in records.iter_mut() {
            let Some(id) = record.get("id") else {
                continue;
            };
            let url = match id {
                Value::String(text) => self.record_url(model, text),
                other => self.record_url(model, other),
            };
            record.entry(URL_KEY).or_insert(Value::String(url));
        }
    }

    /// Response to `create`, shaped after the input: one mapping gives a
    /// singular `id`/`url`, a list gives `ids`/`count`/`urls`.
    pub fn create_response(
        &self,
        model: &str,
        values: &CreateValues,
        created: CreatedIds,
    ) -> Result<CreateResponse, GatewayError> {
        match values {
            CreateValues::Single(_) => {
                let id = match created {
                    CreatedIds::One(id) => id,
                    CreatedIds::Many(ids) if ids.len() == 1 => ids[0],
                    CreatedIds::Many(ids) => {
                        return Err(GatewayError::Protocol(format!(
                            "create returned {} ids for a single record",
                            ids.len()
                        )))
                    }
                };
                Ok(CreateResponse::Single {
                    id,
                    success: true,
                    url: self.record_url(model, id),
                })
            }
            CreateValues::Batch(_) => {
                let ids = created.into_vec();
                let urls = ids.iter().map(|id| self.record_url(model, id)).collect();
                Ok(CreateResponse::Batch {
                    count: ids.len(),
                    ids,
                    success: true,
                    urls,
                })
            }
        }
    }

    /// Response to `write`. A `false` result is reported in the payload, not
    /// as an error.
    pub fn update_response(&self, model: &str, ids: Vec<i64>, updated: bool) -> UpdateResponse {
        if updated {
            let urls = ids.iter().map(|id| self.record_url(model, id)).collect();
            UpdateResponse {
                success: true,
                updated_ids: ids,
                urls: Some(urls),
                error: None,
            }
        } else {
            UpdateResponse {
                success: false,
                updated_ids: ids,
                urls: None,
                error: Some(UPDATE_FAILED.to_string()),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub records: Vec<Record>,
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountResponse {
    pub model: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CreateResponse {
    Single {
        id: i64,
        success: bool,
        url: String,
    },
    Batch {
        ids: Vec<i64>,
        count: usize,
        success: bool,
        urls: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub updated_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFound {
    pub error: &'static str,
}

impl NotFound {
    pub fn record() -> Self {
        Self {
            error: RECORD_NOT_FOUND,
        }
    }
}

/// Pretty JSON with two-space indentation. Keys keep insertion order and
/// non-ASCII text is written unescaped.
pub fn to_text<T: Serialize + ?Sized>(value: &T) -> Result<String, GatewayError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// [`DATETIME_FORMAT`], with the fraction of a second kept when there is one.
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

/// Rewrite the values of date and date-time fields in place.
///
/// Only string values of fields listed in `temporal` are touched; `false`
/// (unset) and text that does not parse are left as they are.
pub fn normalize_temporal(records: &mut [Record], temporal: &TemporalFields) {
    if temporal.is_empty() {
        return;
    }
    for record in records.iter_mut() {
        for (name, value) in record.iter_mut() {
            let (Some(kind), Value::String(text)) = (temporal.get(name), &*value) else {
                continue;
            };
            let normalized = match kind {
                TemporalKind::Date => normalize_date(text),
                TemporalKind::DateTime => normalize_datetime(text),
            };
            if let Some(normalized) = normalized {
                *value = Value::String(normalized);
            }
        }
    }
}

/// `2024-03-05` stays `2024-03-05`.
pub fn normalize_date(text: &str) -> Option<String> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .map(format_date)
}

/// `2024-03-05T10:00:00` becomes `2024-03-05 10:00:00`. Values carrying an
/// offset are converted to UTC, the zone the server stores date-times in.
pub fn normalize_datetime(text: &str) -> Option<String> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(format_datetime(datetime.naive_utc()));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .into_iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .map(format_datetime)
}
