//! Link management service: code allocation and CRUD over the repository.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::get_config;
use crate::errors::{LinkmintError, Result};
use crate::storage::{Link, Repository};
use crate::utils::url_validator::validate_url;
use crate::utils::{generate_random_code, is_valid_code, MAX_CODE_LENGTH, MIN_CODE_LENGTH};

/// Cap on random-code allocation attempts before the whole create is
/// reported as transiently exhausted.
pub const MAX_GENERATE_ATTEMPTS: usize = 10;

/// Request to create a new link.
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Short code (optional, allocated if not provided).
    pub code: Option<String>,
    /// Target URL.
    pub target: String,
}

/// Result of link creation.
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    pub link: Link,
    /// Whether the code was auto-generated.
    pub generated_code: bool,
}

pub struct LinkService {
    storage: Arc<dyn Repository>,
}

impl LinkService {
    pub fn new(storage: Arc<dyn Repository>) -> Self {
        Self { storage }
    }

    fn random_code_length(&self) -> usize {
        get_config().features.random_code_length
    }

    /// Create a new short link.
    ///
    /// A caller-supplied code is validated and checked for conflicts, with no
    /// retry. An allocated code is retried on collision up to
    /// [`MAX_GENERATE_ATTEMPTS`] times. Either way the storage uniqueness
    /// constraint is the final word: a duplicate-key insert is a conflict
    /// (or another attempt), never a generic storage error.
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<LinkCreateResult> {
        validate_url(&req.target).map_err(|e| LinkmintError::validation(e.to_string()))?;

        match req.code.filter(|c| !c.is_empty()) {
            Some(code) => self.create_with_custom_code(code, &req.target).await,
            None => self.create_with_generated_code(&req.target).await,
        }
    }

    async fn create_with_custom_code(&self, code: String, target: &str) -> Result<LinkCreateResult> {
        if !is_valid_code(&code) {
            return Err(LinkmintError::validation(format!(
                "Invalid code '{}'. Codes are {}-{} characters of A-Z, a-z, 0-9 or '-'.",
                code, MIN_CODE_LENGTH, MAX_CODE_LENGTH
            )));
        }

        if self.storage.find_active(&code).await?.is_some() {
            return Err(LinkmintError::conflict(format!(
                "Code '{}' is already taken",
                code
            )));
        }

        let link = self.storage.insert(&code, target).await?;

        info!("Created link '{}' -> '{}'", link.code, link.target_url);
        Ok(LinkCreateResult {
            link,
            generated_code: false,
        })
    }

    async fn create_with_generated_code(&self, target: &str) -> Result<LinkCreateResult> {
        let length = self.random_code_length();

        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let code = generate_random_code(length);

            if self.storage.find_active(&code).await?.is_some() {
                debug!("Generated code '{}' collided (attempt {})", code, attempt);
                continue;
            }

            match self.storage.insert(&code, target).await {
                Ok(link) => {
                    info!("Created link '{}' -> '{}'", link.code, link.target_url);
                    return Ok(LinkCreateResult {
                        link,
                        generated_code: true,
                    });
                }
                // Lost the race between check and insert; just try a new code.
                Err(LinkmintError::Conflict(_)) => {
                    debug!("Generated code '{}' raced on insert (attempt {})", code, attempt);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(LinkmintError::exhausted(format!(
            "Could not allocate a free code in {} attempts; retry the request",
            MAX_GENERATE_ATTEMPTS
        )))
    }

    /// Get a single active link by code.
    pub async fn get_link(&self, code: &str) -> Result<Link> {
        self.storage
            .find_active(code)
            .await?
            .ok_or_else(|| LinkmintError::not_found(format!("Link not found: {}", code)))
    }

    /// Soft-delete an active link. The code becomes available again.
    pub async fn delete_link(&self, code: &str) -> Result<()> {
        self.storage.soft_delete(code).await?;
        info!("Deleted link '{}'", code);
        Ok(())
    }

    /// All active links, newest first, optionally filtered.
    pub async fn list_links(&self, search: Option<&str>) -> Result<Vec<Link>> {
        self.storage.list(search).await
    }
}
