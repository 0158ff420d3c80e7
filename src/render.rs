//! HTML template rendering.
//!
//! Templates are loaded from the configured directory freshly on every
//! render, so edits take effect without a restart. A template that fails to
//! load or execute is logged and the page degrades to an empty body.
//!
use std::path::Path;

use tera::{Context, Tera};
use tracing::warn;

pub(crate) fn render_page(
    templates_dir: &Path,
    name: &str,
    ctx: &Context,
) -> Result<String, tera::Error> {
    let mut tera = Tera::default();
    tera.add_template_file(templates_dir.join(name), Some(name))?;
    tera.render(name, ctx)
}

/// Render a page, logging failures instead of surfacing them to the visitor.
pub(crate) fn render_or_empty(templates_dir: &Path, name: &str, ctx: &Context) -> String {
    match render_page(templates_dir, name, ctx) {
        Ok(body) => body,
        Err(err) => {
            warn!(template = name, error = %err, "render template");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn templates_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
    }

    #[test]
    fn renders_shipped_templates() {
        let mut ctx = Context::new();
        ctx.insert("hostname", "testhost");
        ctx.insert("apps", &Vec::<crate::db::models::App>::new());
        let body = render_page(&templates_dir(), "index.html", &ctx).unwrap();
        assert!(body.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn missing_template_degrades_to_empty_body() {
        let ctx = Context::new();
        let body = render_or_empty(&templates_dir(), "no-such-page.html", &ctx);
        assert_eq!(body, "");
    }
}
