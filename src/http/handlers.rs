//! Request handlers.
//!
//! The CRUD handlers are generic over [`Resource`] and registered once per resource
//! kind in [`super::ApiServer`]. Bodies are read as raw bytes and decoded here, so
//! a create checks the `Token` header before it looks at the body, and a malformed
//! body never reaches the store.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::clients::ResourceClient;
use crate::error::ServiceError;
use crate::framework::{Entity, EntityId, Version, Versioned};
use crate::model::{Category, Order, Product, User};
use crate::pagination::PageRequest;
use crate::protocol::CompositePatch;

pub const TOKEN_HEADER: &str = "token";
pub const VERSION_HEADER: &str = "version";

/// A resource kind exposed over HTTP.
pub trait Resource:
    Entity<Create: DeserializeOwned>
    + Versioned<Replace: DeserializeOwned, Patch: DeserializeOwned>
    + Serialize
{
    fn client(state: &AppState) -> &ResourceClient<Self>;
}

impl Resource for User {
    fn client(state: &AppState) -> &ResourceClient<Self> {
        &state.users
    }
}

impl Resource for Product {
    fn client(state: &AppState) -> &ResourceClient<Self> {
        &state.products
    }
}

impl Resource for Category {
    fn client(state: &AppState) -> &ResourceClient<Self> {
        &state.categories
    }
}

impl Resource for Order {
    fn client(state: &AppState) -> &ResourceClient<Self> {
        &state.orders
    }
}

/// Body of every successful mutation.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Ack {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
            version: None,
            token: None,
        }
    }
}

/// `?page=&per_page=`. A value that is not an integer counts as absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListParams {
    fn from_raw(raw: &HashMap<String, String>) -> Self {
        let int = |key: &str| raw.get(key).and_then(|value| value.trim().parse().ok());
        Self {
            page: int("page"),
            per_page: int("per_page"),
        }
    }
}

/// The `{id}` path segment. Rejections become a JSON `400` like every other error.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub EntityId);

impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<EntityId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))?;
        Ok(Self(id))
    }
}

fn decode<P: DeserializeOwned>(body: &Bytes) -> Result<P, ServiceError> {
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::BadRequest(format!("Invalid request body: {e}")))
}

fn token_header(headers: &HeaderMap) -> Result<String, ServiceError> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or(ServiceError::MissingToken)
}

fn version_header(headers: &HeaderMap) -> Result<Version, ServiceError> {
    headers
        .get(VERSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .ok_or(ServiceError::MissingVersion)
}

// -----------------------------------------------------------------------
// POST /tokens
// -----------------------------------------------------------------------

pub async fn issue_token(State(state): State<AppState>) -> Result<Json<Ack>, ApiError> {
    let token = state.tokens.issue().await?;
    Ok(Json(Ack {
        token: Some(token),
        ..Ack::new("Token created")
    }))
}

// -----------------------------------------------------------------------
// GET /{resource}
// -----------------------------------------------------------------------

pub async fn list<T: Resource>(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(raw) = query.map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))?;
    let params = ListParams::from_raw(&raw);
    let request = PageRequest::from_query(params.page, params.per_page, &state.api)?;
    let page = T::client(&state).list(request).await?;
    Ok(Json(page).into_response())
}

// -----------------------------------------------------------------------
// GET /{resource}/{id}
// -----------------------------------------------------------------------

/// Returns the row with its current version in the `Version` header.
pub async fn fetch<T: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, ApiError> {
    let row = T::client(&state).get(id).await?;
    let version = row.version().to_string();
    Ok(([(VERSION_HEADER, version)], Json(row)).into_response())
}

// -----------------------------------------------------------------------
// POST /{resource}
// -----------------------------------------------------------------------

pub async fn create<T: Resource>(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let token = token_header(&headers)?;
    let params: T::Create = decode(&body)?;

    let row = T::client(&state).create(token, params).await?;
    let ack = Ack {
        id: Some(row.id()),
        ..Ack::new(format!("{} created successfully", T::NAME))
    };
    Ok((StatusCode::CREATED, Json(ack)).into_response())
}

// -----------------------------------------------------------------------
// PUT /{resource}/{id}
// -----------------------------------------------------------------------

/// Optimistic full replace. The `Version` header must match the stored version.
pub async fn replace<T: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let expected = version_header(&headers)?;
    let params: T::Replace = decode(&body)?;

    let version = T::client(&state).replace(id, expected, params).await?;
    let ack = Ack {
        version: Some(version),
        ..Ack::new(format!("{} updated successfully", T::NAME))
    };
    Ok(([(VERSION_HEADER, version.to_string())], Json(ack)).into_response())
}

// -----------------------------------------------------------------------
// PATCH /{resource}/{id}
// -----------------------------------------------------------------------

/// Partial merge, no version check.
pub async fn patch<T: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    body: Bytes,
) -> Result<Json<Ack>, ApiError> {
    let patch: T::Patch = decode(&body)?;
    T::client(&state).patch(id, patch).await?;
    Ok(Json(Ack::new(format!("{} modified successfully", T::NAME))))
}

/// `PATCH /categories/{id}`: the category variant also accepts a nested
/// `products` array of `{id, name}` renames.
pub async fn patch_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    body: Bytes,
) -> Result<Json<Ack>, ApiError> {
    let patch: CompositePatch = decode(&body)?;
    let outcome = state.categories.patch_with_products(id, patch).await?;
    debug!(category_id = id, renamed = outcome.renamed, "Composite patch applied");
    Ok(Json(Ack::new(
        "Category and associated products modified successfully",
    )))
}

// -----------------------------------------------------------------------
// DELETE /{resource}/{id}
// -----------------------------------------------------------------------

pub async fn remove<T: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Ack>, ApiError> {
    T::client(&state).delete(id).await?;
    Ok(Json(Ack::new(format!("{} deleted successfully", T::NAME))))
}

// -----------------------------------------------------------------------
// GET /categories/{id}/products
// -----------------------------------------------------------------------

pub async fn category_products(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.categories.products(id).await?))
}
