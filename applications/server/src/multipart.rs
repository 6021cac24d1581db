/// multipart/form-data parsing for uploads
use crate::error::{Result, ServerError};
use axum::http::{header, HeaderMap};
use bytes::Bytes;
use std::collections::HashMap;

/// A file part of a form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-side filename, empty when the browser sent none
    pub filename: String,
    pub data: Bytes,
}

/// Text fields and file parts of a submitted form
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Non-empty text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// File part that carries a filename; an unselected file input counts as absent
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.raw_file(name).filter(|f| !f.filename.is_empty())
    }

    /// File part exactly as submitted
    pub fn raw_file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// Parse a buffered multipart body
    pub async fn parse(headers: &HeaderMap, body: Bytes) -> Result<Self> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

        if !content_type.starts_with("multipart/form-data") {
            return Err(ServerError::BadRequest(
                "Expected multipart/form-data".to_string(),
            ));
        }

        let boundary = multer::parse_boundary(content_type)
            .map_err(|_| ServerError::BadRequest("Missing boundary".to_string()))?;

        // Convert Bytes to a stream for multer
        let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if let Some(filename) = field.file_name().map(str::to_string) {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?;
                form.files.insert(name, UploadedFile { filename, data });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {}", e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}
