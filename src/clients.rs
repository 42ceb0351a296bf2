//! Thin clients for the remote collaborators: the identity provider, the
//! flashcard generation endpoint and the hosted checkout provider. None of
//! them retry; a failed call is surfaced once and the caller decides what to
//! render.

use crate::db::Flashcard;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(StatusCode),
    #[error("Malformed response body")]
    MalformedBody,
}

/// Verifies session tokens against the external identity provider. The
/// provider owns sign-up, sign-in and token issuance; this backend only ever
/// asks "who is this token?".
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedUser {
    pub is_authenticated: bool,
    pub user_id: String,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    pub async fn verify(&self, token: &str) -> Result<VerifiedUser, ClientError> {
        let response = self
            .http
            .post(format!("{}/verify", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        response
            .json()
            .await
            .map_err(|_| ClientError::MalformedBody)
    }
}

/// Calls the generation endpoint with a raw prompt and expects a JSON array
/// of front/back pairs back. Anything else counts as "no cards produced".
#[derive(Clone)]
pub struct GenerateClient {
    http: reqwest::Client,
    url: String,
}

impl GenerateClient {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }

    pub async fn generate(&self, prompt: &str) -> Result<Vec<Flashcard>, ClientError> {
        let response = self
            .http
            .post(&self.url)
            .body(prompt.to_owned())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        response
            .json()
            .await
            .map_err(|_| ClientError::MalformedBody)
    }
}

/// Creates hosted checkout sessions. Payment itself happens entirely on the
/// provider's page; we only redirect the browser to the returned URL.
#[derive(Clone)]
pub struct CheckoutClient {
    http: reqwest::Client,
    url: String,
    secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

impl CheckoutClient {
    pub fn new(http: reqwest::Client, url: String, secret_key: String) -> Self {
        Self {
            http,
            url,
            secret_key,
        }
    }

    pub async fn create_session(&self) -> Result<CheckoutSession, ClientError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        response
            .json()
            .await
            .map_err(|_| ClientError::MalformedBody)
    }
}
