//! PostgREST Query Builder
//!
//! `client.from("tasks").select("*").eq("user_id", id).order("created_at", false)`
//! renders to `GET /rest/v1/tasks?select=*&user_id=eq.<id>&order=created_at.desc`.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{encode, ClientConfig};
use crate::error::{check, Result};

pub struct QueryBuilder {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    table: String,
    token: Option<String>,
    method: Method,
    columns: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    body: Option<serde_json::Value>,
}

impl QueryBuilder {
    pub(crate) fn new(
        http: reqwest::Client,
        config: Arc<ClientConfig>,
        table: &str,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            config,
            table: table.to_string(),
            token,
            method: Method::GET,
            columns: None,
            filters: Vec::new(),
            order: Vec::new(),
            body: None,
        }
    }

    // ========================
    // Verbs
    // ========================

    pub fn select(mut self, columns: &str) -> Self {
        self.method = Method::GET;
        self.columns = Some(columns.to_string());
        self
    }

    pub fn insert<T: Serialize + ?Sized>(mut self, row: &T) -> Result<Self> {
        self.method = Method::POST;
        self.body = Some(serde_json::to_value(row)?);
        Ok(self)
    }

    /// Partial update: only the fields present in `patch` are written
    pub fn update<T: Serialize + ?Sized>(mut self, patch: &T) -> Result<Self> {
        self.method = Method::PATCH;
        self.body = Some(serde_json::to_value(patch)?);
        Ok(self)
    }

    pub fn delete(mut self) -> Self {
        self.method = Method::DELETE;
        self
    }

    // ========================
    // Modifiers
    // ========================

    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// Append an ordering term; terms apply in the order they were added
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{}.{}", column, direction));
        self
    }

    pub fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(columns) = &self.columns {
            pairs.push(("select", columns.clone()));
        }
        for (column, condition) in &self.filters {
            pairs.push((column.as_str(), condition.clone()));
        }
        if !self.order.is_empty() {
            pairs.push(("order", self.order.join(",")));
        }
        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn request(&self) -> reqwest::RequestBuilder {
        let mut url = self.config.endpoint(&format!("/rest/v1/{}", self.table));
        let query = self.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let anon_key = self.config.anon_key();
        let mut builder = self
            .http
            .request(self.method.clone(), url)
            .header("apikey", anon_key)
            .bearer_auth(self.token.as_deref().unwrap_or(anon_key));
        if self.method != Method::GET {
            builder = builder.header("Prefer", "return=minimal");
        }
        if let Some(body) = &self.body {
            builder = builder.json(body);
        }
        builder
    }

    /// Build the HTTP request without sending it
    pub fn build(&self) -> Result<reqwest::Request> {
        Ok(self.request().build()?)
    }

    /// Send a mutation and discard the (minimal) response
    pub async fn execute(self) -> Result<()> {
        tracing::debug!(table = %self.table, method = %self.method, "postgrest request");
        let response = self.request().send().await?;
        check(response).await?;
        Ok(())
    }

    /// Send a select and decode the returned rows
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        tracing::debug!(table = %self.table, query = %self.query_string(), "postgrest select");
        let response = self.request().send().await?;
        let rows = check(response).await?.json::<Vec<T>>().await?;
        Ok(rows)
    }
}
