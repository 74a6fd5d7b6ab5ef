/// Defaults shared by configuration, the CLI and the page renderer

// Storage
pub const DEFAULT_DB_PATH: &str = "data/movies.db";

// OMDb
pub const OMDB_API_KEY_ENV: &str = "OMDB_API_KEY";
pub const DEFAULT_OMDB_BASE_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_OMDB_TIMEOUT_SECONDS: u64 = 10;

// Landing page
pub const DEFAULT_TEMPLATE_PATH: &str = "_static/index_template.html";
pub const DEFAULT_PAGE_OUTPUT_PATH: &str = "_static/index.html";
pub const DEFAULT_SITE_TITLE: &str = "MOVIE-DB";
pub const TEMPLATE_TITLE_MARKER: &str = "__TEMPLATE_TITLE__";
pub const TEMPLATE_GRID_MARKER: &str = "__TEMPLATE_MOVIE_GRID__";

// Logging
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "moviedb.log";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const EMPTY_CATALOG_MESSAGE: &str = "Database is empty, add movies to database.";
