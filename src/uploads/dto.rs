use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub result: String,
    pub url: String,
}
