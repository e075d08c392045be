use anyhow::{anyhow, Result};

use crate::database::models::DEFAULT_CATEGORY;

/// Field separator in the add-movie payload.
pub const MOVIE_FIELD_SEPARATOR: char = ';';

/// Expected add-movie payload, shown to admins on format errors.
pub const MOVIE_PAYLOAD_FORMAT: &str = "code;file_id;title;category";

/// Codes and category names travel inside callback data, which the platform
/// caps at 64 bytes including the `movie:` / `category:` prefix.
pub const MAX_KEY_BYTES: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePayload {
    pub code: String,
    pub file_id: String,
    pub title: String,
    pub category: String,
}

pub fn parse_movie_payload(text: &str) -> Result<MoviePayload> {
    let fields: Vec<&str> = text.split(MOVIE_FIELD_SEPARATOR).map(str::trim).collect();

    if fields.len() != 4 {
        return Err(anyhow!(
            "Expected 4 fields separated by '{}', got {}",
            MOVIE_FIELD_SEPARATOR,
            fields.len()
        ));
    }

    let code = validate_movie_code(fields[0])?;

    let file_id = fields[1];
    if file_id.is_empty() {
        return Err(anyhow!("file_id cannot be empty"));
    }

    let title = fields[2];
    if title.is_empty() {
        return Err(anyhow!("Title cannot be empty"));
    }

    let category = if fields[3].is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        validate_category_name(fields[3])?
    };

    Ok(MoviePayload {
        code,
        file_id: file_id.to_string(),
        title: title.to_string(),
        category,
    })
}

pub fn validate_movie_code(code: &str) -> Result<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(anyhow!("Movie code cannot be empty"));
    }

    if code.len() > MAX_KEY_BYTES {
        return Err(anyhow!("Movie code cannot be longer than {} bytes", MAX_KEY_BYTES));
    }

    if code.contains('\n') || code.contains('\r') {
        return Err(anyhow!("Movie code cannot contain line breaks"));
    }

    Ok(code.to_string())
}

pub fn validate_category_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Category name cannot be empty"));
    }

    if name.len() > MAX_KEY_BYTES {
        return Err(anyhow!("Category name cannot be longer than {} bytes", MAX_KEY_BYTES));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Category name cannot contain line breaks"));
    }

    Ok(name.to_string())
}

pub fn validate_broadcast_text(text: &str) -> Result<String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(anyhow!("Broadcast message cannot be empty"));
    }

    Ok(text.to_string())
}
