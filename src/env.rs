//! Request-context detection.
//!
//! The host platform decides what kind of request is being served (admin
//! screen, AJAX call, REST call, cron run, CLI command). Themes only need
//! the answers, so the host fills in a [`RequestContext`] once per request
//! and helpers like [`svg::SvgLibrary::render_sprite`](crate::svg::SvgLibrary::render_sprite)
//! read from it.

/// What kind of request is being served.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Serving an admin screen (AJAX calls from the frontend count too).
    pub admin: bool,
    pub ajax: bool,
    pub rest: bool,
    pub cli: bool,
    pub cron: bool,
    /// Raw request URI including the query string.
    pub request_uri: String,
}

impl RequestContext {
    /// Build a context from CGI-style environment variables.
    ///
    /// Only `REQUEST_URI` is read; every flag defaults to `false`.
    pub fn from_env() -> Self {
        Self {
            request_uri: std::env::var("REQUEST_URI").unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Visitor-facing request: AJAX from an admin context, or anything that
    /// is not admin, REST, CLI or cron.
    pub fn is_frontend(&self) -> bool {
        (self.admin && self.ajax) || (!self.admin && !self.rest && !self.cli && !self.cron)
    }

    pub fn is_backend(&self) -> bool {
        self.admin
    }

    pub fn is_cli(&self) -> bool {
        self.cli
    }

    pub fn is_cron(&self) -> bool {
        self.cron
    }

    pub fn is_rest(&self) -> bool {
        self.rest
    }

    pub fn is_ajax(&self) -> bool {
        self.ajax
    }

    /// Whether the request URI contains `marker` (e.g. a page-builder
    /// preview query parameter). An empty marker never matches.
    pub fn uri_contains(&self, marker: &str) -> bool {
        crate::text::contains_any(&self.request_uri, &[marker])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_frontend() {
        let ctx = RequestContext::default();
        assert!(ctx.is_frontend());
        assert!(!ctx.is_backend());
    }

    #[test]
    fn admin_screen_is_backend_not_frontend() {
        let ctx = RequestContext {
            admin: true,
            ..Default::default()
        };
        assert!(ctx.is_backend());
        assert!(!ctx.is_frontend());
    }

    #[test]
    fn admin_ajax_counts_as_frontend() {
        let ctx = RequestContext {
            admin: true,
            ajax: true,
            ..Default::default()
        };
        assert!(ctx.is_frontend());
        assert!(ctx.is_ajax());
    }

    #[test]
    fn rest_cli_and_cron_are_not_frontend() {
        for ctx in [
            RequestContext { rest: true, ..Default::default() },
            RequestContext { cli: true, ..Default::default() },
            RequestContext { cron: true, ..Default::default() },
        ] {
            assert!(!ctx.is_frontend(), "{ctx:?}");
        }
        assert!(RequestContext { rest: true, ..Default::default() }.is_rest());
        assert!(RequestContext { cli: true, ..Default::default() }.is_cli());
        assert!(RequestContext { cron: true, ..Default::default() }.is_cron());
    }

    #[test]
    fn uri_contains_marker() {
        let ctx = RequestContext {
            request_uri: "/wp-admin/post.php?post=1&action=elementor".to_string(),
            ..Default::default()
        };
        assert!(ctx.uri_contains("action=elementor"));
        assert!(!ctx.uri_contains("action=edit"));
        assert!(!ctx.uri_contains(""));
    }
}
