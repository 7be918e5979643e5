//! Multipart form reading for post and image uploads.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;

use thoughtlane_core::domain::Upload;

use crate::middleware::error::{AppError, AppResult};

/// Name of the file part in every upload form.
const FILE_FIELD: &str = "file";

/// Most parts a form may carry. Post forms use seven.
const MAX_PARTS: usize = 16;

/// A fully buffered multipart form: text fields plus at most one file.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub file: Option<Upload>,
}

impl UploadForm {
    /// Read the whole form. The file may take up to `max_bytes`, and all
    /// text fields together share a second `max_bytes` budget.
    pub async fn read(mut payload: Multipart, max_bytes: usize) -> AppResult<Self> {
        let mut form = Self::default();
        let mut parts = 0;
        let mut seen_file = false;
        let mut text_budget = max_bytes;

        while let Some(item) = payload.next().await {
            let field = item.map_err(|e| AppError::BadRequest(format!("Malformed form: {e}")))?;

            parts += 1;
            if parts > MAX_PARTS {
                return Err(AppError::BadRequest(format!(
                    "Form has more than {MAX_PARTS} parts"
                )));
            }

            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD {
                if seen_file {
                    return Err(AppError::BadRequest("Only one file may be uploaded".to_string()));
                }
                seen_file = true;

                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_string())
                    .unwrap_or_default();
                let bytes = read_field(field, max_bytes, "Upload").await?;

                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    form.file = Some(Upload {
                        filename,
                        content_type,
                        bytes,
                    });
                }
            } else {
                let bytes = read_field(field, text_budget, "Form text").await?;
                text_budget -= bytes.len();
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest(format!("Field `{name}` is not UTF-8")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, if sent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// The `tags` field: a JSON array of strings. Unparseable input is
    /// logged and treated as absent.
    pub fn tags(&self) -> Option<Vec<String>> {
        let raw = self.fields.get("tags")?;
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(tags) => Some(tags),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed tags field");
                None
            }
        }
    }
}

async fn read_field(mut field: Field, limit: usize, what: &str) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Malformed form: {e}")))?;
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!("{what} exceeds the byte limit")));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> UploadForm {
        UploadForm {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    #[test]
    fn test_tags_parse_json_array() {
        let form = form(&[("tags", r#"["rust", "web"]"#)]);
        assert_eq!(form.tags(), Some(vec!["rust".to_string(), "web".to_string()]));
    }

    #[test]
    fn test_malformed_tags_are_ignored() {
        assert_eq!(form(&[("tags", "rust, web")]).tags(), None);
        assert_eq!(form(&[]).tags(), None);
    }
}
