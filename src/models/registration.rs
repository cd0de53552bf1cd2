use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateRetailerRequest {
    pub business_name: String,
    pub owner_name: String,
    pub nid_number: String,
    pub bin_number: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub zone_id: String,
    pub division_id: String,
    pub circle_id: String,
    pub commission_rate_id: String,
    pub service_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBranchRequest {
    pub branch_name: String,
    pub address: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub file_path: String,
    pub document_kind: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub id: i32,
    pub remote_id: Option<String>,
    pub message: String,
    pub already_exists: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub status: String,
    pub file_url: Option<String>,
}
