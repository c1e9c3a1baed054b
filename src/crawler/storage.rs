use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::{io, path::Path};
use tokio::fs;
use url::Url;

use super::CrawlResult;
use crate::error::Error as CrateError;

/// A single article with its place in the tree flattened into fields
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlatArticle {
    /// Last path segment of the article URL
    pub id: String,

    pub title: String,
    pub url: String,

    /// Title of the category the article was found under
    pub category: String,

    /// Title of the subcategory the article was found under
    pub subcategory: String,

    pub content: String,
}

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for CrateError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => CrateError::Io(e),
            StorageError::Json(e) => CrateError::Json(e),
            StorageError::NotFound(msg) => CrateError::Other(msg),
        }
    }
}

type Result<T> = std::result::Result<T, StorageError>;

/// Serialize `value` as JSON indented with four spaces, non-ASCII kept literal
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Creates the parent directory of `path` if needed
async fn ensure_directories(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_directories(path).await?;
    fs::write(path, to_pretty_json(value)?).await?;
    Ok(())
}

/// Writes a crawl result to `path` as indented UTF-8 JSON
pub async fn write_result(path: &Path, result: &CrawlResult) -> Result<()> {
    write_json(path, result).await
}

/// Loads a crawl result previously written with `write_result`
pub async fn read_result(path: &Path) -> Result<CrawlResult> {
    if !fs::try_exists(path).await? {
        return Err(StorageError::NotFound(format!(
            "No crawl output at {}",
            path.display()
        )));
    }
    let json = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}

/// Writes a flat article list to `path`
pub async fn write_flat(path: &Path, articles: &[FlatArticle]) -> Result<()> {
    write_json(path, articles).await
}

/// Identifier for an article: the last non-empty path segment of its URL
pub fn article_id(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        })
        .unwrap_or_else(|| url.to_string())
}

/// Flattens the tree into one record per article, in crawl order
pub fn flatten(result: &CrawlResult) -> Vec<FlatArticle> {
    result
        .categories
        .iter()
        .flat_map(|category| {
            category.subcategories.iter().flat_map(move |subcategory| {
                subcategory.articles.iter().map(move |article| FlatArticle {
                    id: article_id(&article.url),
                    title: article.title.clone(),
                    url: article.url.clone(),
                    category: category.title.clone(),
                    subcategory: subcategory.title.clone(),
                    content: article.content.clone(),
                })
            })
        })
        .collect()
}
