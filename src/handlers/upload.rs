use actix_multipart::Multipart;
use actix_web::web::{Data, Json};
use bytes::Bytes;
use futures_util::TryStreamExt;
use serde::Serialize;

use crate::error::Error;
use crate::storer::FileStorer;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub codes: Vec<String>,
}

pub async fn create<S: FileStorer>(mut payload: Multipart, storer: Data<S>) -> Result<Json<UploadResponse>, Error> {
    let mut codes = Vec::new();
    while let Some(mut field) = payload.try_next().await? {
        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            content.extend_from_slice(&chunk);
        }
        let code = storer.write(Bytes::from(content))?;
        codes.push(code);
    }
    Ok(Json(UploadResponse { codes }))
}
