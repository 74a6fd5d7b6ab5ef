use crate::app::catalog_service::CatalogService;
use crate::config::SiteConfig;
use crate::constants::{TEMPLATE_GRID_MARKER, TEMPLATE_TITLE_MARKER};
use crate::error::{CatalogError, Result};
use crate::types::MovieRecord;
use std::fs;
use std::path::PathBuf;
use tracing::info;

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One `<li>` per movie, in the order given.
pub fn render_movie_grid(movies: &[MovieRecord]) -> String {
    let mut output = String::new();
    for movie in movies {
        output.push_str(&format!(
            "    <li class=\"movie\">\n        <img class=\"movie-poster\" src=\"{}\">\n        <p class=\"movie-title\">{}</p>\n        <p class=\"movie-year\">{}</p>\n    </li>\n",
            escape_html(&movie.poster_url),
            escape_html(&movie.title),
            movie.year,
        ));
    }
    output
}

/// Fill the title and grid markers of `template`. Marker lines are trimmed
/// before substitution; other lines pass through untouched.
pub fn render_landing_page(template: &str, site_title: &str, movies: &[MovieRecord]) -> Result<String> {
    if !template.contains(TEMPLATE_GRID_MARKER) {
        return Err(CatalogError::Template(format!(
            "template has no {TEMPLATE_GRID_MARKER} marker"
        )));
    }

    let grid = render_movie_grid(movies);
    let title = escape_html(site_title);
    let mut page = String::with_capacity(template.len() + grid.len());
    for line in template.split_inclusive('\n') {
        let newline = if line.ends_with('\n') { "\n" } else { "" };
        if line.contains(TEMPLATE_TITLE_MARKER) {
            page.push_str(&line.trim().replace(TEMPLATE_TITLE_MARKER, &title));
            page.push_str(newline);
        } else if line.contains(TEMPLATE_GRID_MARKER) {
            page.push_str(&line.trim().replace(TEMPLATE_GRID_MARKER, &grid));
            page.push_str(newline);
        } else {
            page.push_str(line);
        }
    }
    Ok(page)
}

/// Render the whole catalog into `site.output_path` and return that path.
pub fn generate_landing_page(service: &CatalogService, site: &SiteConfig) -> Result<PathBuf> {
    let template = fs::read_to_string(&site.template_path).map_err(|e| {
        CatalogError::Template(format!(
            "Failed to read template '{}': {}",
            site.template_path.display(),
            e
        ))
    })?;
    let movies = service.full_listing()?;
    let page = render_landing_page(&template, &site.title, &movies)?;

    if let Some(parent) = site.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&site.output_path, page)?;
    info!(
        "Rendered {} movies to {}",
        movies.len(),
        site.output_path.display()
    );
    Ok(site.output_path.clone())
}
