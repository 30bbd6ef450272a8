use log::error;
use rocket::State;
use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::config::Config;
use crate::models::{
    self, DevelopmentWork, Member, Official, TaxQrCodes, VillageProfile,
};
use crate::services::ContentService;
use crate::utils::{ApiError, ApiResponse};

#[openapi(tag = "Content")]
#[get("/devworks")]
pub async fn get_development_works(
    content: &State<ContentService>,
) -> Result<Json<Vec<DevelopmentWork>>, ApiError> {
    content.development_works().await.map(Json).map_err(|e| {
        error!("Development works unavailable: {}", e);
        ApiError::bad_gateway("विकास कामे उपलब्ध नाहीत.")
    })
}

#[openapi(tag = "Content")]
#[get("/qr")]
pub async fn get_tax_qr_codes(
    content: &State<ContentService>,
) -> Result<Json<TaxQrCodes>, ApiError> {
    content.tax_qr_codes().await.map(Json).map_err(|e| {
        error!("Tax QR codes unavailable: {}", e);
        ApiError::bad_gateway("QR कोड उपलब्ध नाहीत.")
    })
}

#[openapi(tag = "Content")]
#[get("/village")]
pub fn get_village() -> Json<ApiResponse<VillageProfile>> {
    Json(ApiResponse::success(VillageProfile::new(
        Config::village_name(),
        Config::taluka(),
        Config::district(),
    )))
}

#[openapi(tag = "Content")]
#[get("/officials")]
pub fn get_officials() -> Json<ApiResponse<Vec<Official>>> {
    Json(ApiResponse::success(models::state_officials()))
}

#[openapi(tag = "Content")]
#[get("/members")]
pub fn get_members() -> Json<ApiResponse<Vec<Member>>> {
    Json(ApiResponse::success(models::executive_members()))
}

#[openapi(tag = "Content")]
#[get("/slogans")]
pub fn get_slogans() -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::success(models::slogans()))
}
