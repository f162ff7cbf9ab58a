use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::ServerConfig;
use crate::error::GatewayError;
use crate::odoo::{
    plan_read, Connection, CreateValues, Domain, DomainTerm, ReadOptions, SharedConnection,
    DEFAULT_FIELD_ATTRIBUTES,
};
use crate::policy::WritePolicy;
use crate::shape::{
    normalize_temporal, to_text, CountResponse, DeleteResponse, NotFound, SearchResponse, Shaper,
};

/// Model holding the registry of installed models.
pub const MODEL_REGISTRY: &str = "ir.model";

/// Page size of model listings.
pub const MODEL_LIST_LIMIT: u32 = 500;

/// Domain of [`Gateway::list_models`]: every model, or those whose
/// technical or display name contains `name_filter`.
pub fn model_filter(name_filter: Option<&str>) -> Result<Domain, GatewayError> {
    let domain = match name_filter.filter(|f| !f.is_empty()) {
        Some(filter) => Domain::from(DomainTerm::Or(vec![
            DomainTerm::leaf("model", "ilike", filter),
            DomainTerm::leaf("name", "ilike", filter),
        ])),
        None => Domain::all(),
    };
    domain.validate()?;
    Ok(domain)
}

/// The operations offered to tool and resource callers.
///
/// Every operation returns the text sent back to the caller. Write methods
/// pass the [`WritePolicy`] before the connection is even looked up.
pub struct Gateway {
    shaper: Shaper,
    policy: WritePolicy,
    connection: SharedConnection,
}

impl Gateway {
    pub fn new(config: &ServerConfig) -> Self {
        let connection =
            SharedConnection::new(&config.odoo_url, &config.database, &config.api_key);
        Self::with_connection(config, connection)
    }

    pub fn with_connection(config: &ServerConfig, connection: SharedConnection) -> Self {
        Self {
            shaper: Shaper::new(&config.odoo_url),
            policy: WritePolicy::new(config.readonly),
            connection,
        }
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    pub fn shaper(&self) -> &Shaper {
        &self.shaper
    }

    pub fn connection(&self) -> &SharedConnection {
        &self.connection
    }

    async fn session(&self) -> Result<Arc<Connection>, GatewayError> {
        self.connection.get().await
    }

    /// Technical and display names of installed models, optionally those
    /// whose either name contains `name_filter` (case-insensitive).
    pub async fn list_models(&self, name_filter: Option<&str>) -> Result<String, GatewayError> {
        let domain = model_filter(name_filter)?;
        let options = ReadOptions {
            fields: Some(vec!["model".into(), "name".into()]),
            limit: MODEL_LIST_LIMIT,
            ..ReadOptions::default()
        };

        let session = self.session().await?;
        let records = session
            .model(MODEL_REGISTRY)
            .search_read(&domain, &options)
            .await?;
        to_text(&records)
    }

    /// Field definitions of `model` sorted by name, each with a `name` key
    /// followed by the requested attributes.
    pub async fn get_fields(
        &self,
        model: &str,
        field_filter: Option<&str>,
        fields: Option<&[String]>,
        attributes: Option<&[String]>,
    ) -> Result<String, GatewayError> {
        let defaults: Vec<String>;
        let attributes = match attributes.filter(|a| !a.is_empty()) {
            Some(attributes) => attributes,
            None => {
                defaults = DEFAULT_FIELD_ATTRIBUTES.iter().map(|a| a.to_string()).collect();
                &defaults
            }
        };
        let needle = field_filter
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let session = self.session().await?;
        let descriptors = session
            .model(model)
            .fields_get(fields, Some(attributes))
            .await?;

        let listing: Vec<Map<String, Value>> = descriptors
            .into_iter()
            .filter(|(name, _)| {
                needle
                    .as_deref()
                    .map_or(true, |needle| name.to_lowercase().contains(needle))
            })
            .map(|(name, descriptor)| {
                let mut entry = Map::new();
                entry.insert("name".into(), Value::String(name));
                entry.extend(descriptor.into_attributes());
                entry
            })
            .collect();
        to_text(&listing)
    }

    /// Call any method of `model`. Blocked in read-only mode when `method`
    /// is a write method. The result is returned as the server sent it.
    pub async fn execute_method(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<String, GatewayError> {
        self.policy.check_allowed(method)?;
        let session = self.session().await?;
        let result = session.model(model).invoke(method, args, kwargs).await?;
        to_text(&result)
    }

    /// One page of matching records plus the total match count.
    ///
    /// Without `options.fields`, fields of the [`crate::odoo::DANGEROUS_FIELD_TYPES`] are
    /// left out. Date and date-time fields are normalized.
    pub async fn search_records(
        &self,
        model: &str,
        domain: &Domain,
        mut options: ReadOptions,
    ) -> Result<String, GatewayError> {
        let session = self.session().await?;
        let proxy = session.model(model);
        let plan = plan_read(&proxy, options.fields.take()).await?;
        options.fields = Some(plan.fields);

        let mut records = proxy.search_read(domain, &options).await?;
        let total = proxy.search_count(domain).await?;
        normalize_temporal(&mut records, &plan.temporal);
        self.shaper.attach_urls(model, &mut records);

        to_text(&SearchResponse {
            records,
            total,
            limit: options.limit,
            offset: options.offset,
        })
    }

    pub async fn count_records(
        &self,
        model: &str,
        domain: &Domain,
    ) -> Result<String, GatewayError> {
        let session = self.session().await?;
        let count = session.model(model).search_count(domain).await?;
        to_text(&CountResponse {
            model: model.to_string(),
            count,
        })
    }

    /// Records by id; unknown ids are skipped. Fields are chosen as in
    /// [`Gateway::search_records`].
    pub async fn read_records(
        &self,
        model: &str,
        ids: &[i64],
        fields: Option<Vec<String>>,
    ) -> Result<String, GatewayError> {
        let session = self.session().await?;
        let proxy = session.model(model);
        let plan = plan_read(&proxy, fields).await?;

        let mut records = proxy.read(ids, Some(&plan.fields)).await?;
        normalize_temporal(&mut records, &plan.temporal);
        self.shaper.attach_urls(model, &mut records);
        to_text(&records)
    }

    pub async fn create_record(
        &self,
        model: &str,
        values: &CreateValues,
    ) -> Result<String, GatewayError> {
        self.policy.check_allowed("create")?;
        let session = self.session().await?;
        let created = session.model(model).create(values).await?;
        to_text(&self.shaper.create_response(model, values, created)?)
    }

    pub async fn update_record(
        &self,
        model: &str,
        ids: Vec<i64>,
        values: &Map<String, Value>,
    ) -> Result<String, GatewayError> {
        self.policy.check_allowed("write")?;
        let session = self.session().await?;
        let updated = session.model(model).write(&ids, values).await?;
        to_text(&self.shaper.update_response(model, ids, updated))
    }

    pub async fn delete_record(&self, model: &str, ids: Vec<i64>) -> Result<String, GatewayError> {
        self.policy.check_allowed("unlink")?;
        let session = self.session().await?;
        let success = session.model(model).unlink(&ids).await?;
        to_text(&DeleteResponse {
            success,
            deleted_ids: ids,
        })
    }

    /// One record with its safe fields, or the not-found sentinel. No URL
    /// is attached.
    pub async fn read_record(&self, model: &str, id: i64) -> Result<String, GatewayError> {
        let session = self.session().await?;
        let proxy = session.model(model);
        let plan = plan_read(&proxy, None).await?;
        let mut records = proxy.read(&[id], Some(&plan.fields)).await?;
        normalize_temporal(&mut records, &plan.temporal);
        match records.first() {
            Some(record) => to_text(record),
            None => to_text(&NotFound::record()),
        }
    }
}
