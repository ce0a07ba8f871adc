//! Link management service
//!
//! The surface a form, dashboard or redirect handler talks to: runs every
//! validator before touching the registry, builds public short links and
//! decides what a redirect request should do.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};

use crate::config::RedirectConfig;
use crate::errors::{Result, SnaplinkError};
use crate::event_log::{EventLog, LogEvent};
use crate::registry::UrlRegistry;
use crate::storage::{LinkStats, ShortenedUrl};
use crate::utils::build_short_url;
use crate::validation::{
    ValidationReport, validate_expiry_minutes, validate_short_code, validate_url,
};

// ============ Request/Response DTOs ============

/// Form input for a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Destination URL
    pub url: String,
    /// Short code (optional, generated when absent or empty)
    pub custom_code: Option<String>,
    /// Lifetime in minutes (optional, registry default when absent)
    pub expiry_minutes: Option<i64>,
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: ShortenedUrl,
    /// Public link, base origin + short code
    pub short_url: String,
    /// Whether the code was auto-generated
    pub generated_code: bool,
}

/// What the redirect entry point should do with a short code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Send the visitor to `target` after showing the interstitial for `delay`
    Redirect { target: String, delay: Duration },
    /// Unknown, inactive or expired: render the error page
    NotFound,
}

// ============ LinkService Implementation ============

pub struct LinkService {
    registry: Arc<UrlRegistry>,
    events: Arc<EventLog>,
    redirect: RedirectConfig,
}

impl LinkService {
    pub fn new(registry: Arc<UrlRegistry>, events: Arc<EventLog>, redirect: RedirectConfig) -> Self {
        Self {
            registry,
            events,
            redirect,
        }
    }

    pub fn registry(&self) -> &Arc<UrlRegistry> {
        &self.registry
    }

    /// Runs every validator over the request, reporting all violations together
    pub fn validate(&self, req: &CreateLinkRequest) -> Result<()> {
        let mut report = ValidationReport::default();
        report.merge(validate_url(&req.url));
        if let Some(code) = req.custom_code.as_deref() {
            report.merge(validate_short_code(code));
        }
        if let Some(minutes) = req.expiry_minutes {
            report.merge(validate_expiry_minutes(minutes));
        }

        if let Some(pattern) = report.blocked_pattern {
            self.events.warn(
                "security_blocked_url",
                json!({ "pattern": pattern, "url": req.url }),
            );
        }
        if !report.is_valid() {
            self.events
                .warn("validation_failed", json!({ "errors": report.errors }));
        }

        report.into_result()
    }

    /// Create a new short link
    pub fn create_link(&self, req: CreateLinkRequest) -> Result<CreatedLink> {
        self.validate(&req)?;

        let custom_code = req.custom_code.as_deref().filter(|c| !c.is_empty());
        // validated into 1..=43200 above
        let ttl = req
            .expiry_minutes
            .and_then(|minutes| u32::try_from(minutes).ok());

        let link = self.registry.shorten(req.url.trim(), custom_code, ttl)?;
        let short_url = self.short_url(&link.short_code);
        info!("LinkService: created '{}' -> '{}'", short_url, link.original_url);

        Ok(CreatedLink {
            link,
            short_url,
            generated_code: custom_code.is_none(),
        })
    }

    pub fn short_url(&self, code: &str) -> String {
        build_short_url(&self.redirect.base_origin, code)
    }

    /// Resolves a short code for the redirect entry point, recording the click
    pub fn resolve(&self, code: &str, user_agent: &str, referrer: &str) -> RedirectOutcome {
        let Some(link) = self.registry.lookup_by_short_code(code) else {
            debug!("LinkService: no live link for '{}'", code);
            self.events
                .warn("redirect_not_found", json!({ "shortCode": code }));
            return RedirectOutcome::NotFound;
        };

        if !self.registry.record_click(code, user_agent, referrer) {
            // expired between lookup and click
            return RedirectOutcome::NotFound;
        }

        RedirectOutcome::Redirect {
            target: link.original_url,
            delay: Duration::from_millis(self.redirect.delay_ms),
        }
    }

    pub fn list_links(&self) -> Vec<ShortenedUrl> {
        self.registry.list_all()
    }

    /// Delete a link by id
    pub fn delete_link(&self, id: &str) -> Result<()> {
        if self.registry.delete(id) {
            Ok(())
        } else {
            Err(SnaplinkError::not_found(format!("Link '{}' not found", id)))
        }
    }

    pub fn stats(&self) -> LinkStats {
        self.registry.stats()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.events()
    }
}
