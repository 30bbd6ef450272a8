use data_encoding::BASE64;
use log::{debug, error};
use rocket::State;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::models::{
    CertificateType, CertificateTypeInfo, FormInput, PaymentProof, ValidationError,
    ValidationReport, catalogue,
};
use crate::services::{CertificateRequestForm, SharedSubmitter, SubmissionOutcome};
use crate::utils::{ApiError, ApiResponse};

// ============================================================================
// REQUEST BODIES
// ============================================================================

/// Multipart body of the public request form.
#[derive(Debug, FromForm)]
pub struct DakhalaUpload<'r> {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    #[field(name = "type")]
    pub certificate_type: Option<String>,
    #[field(name = "childName")]
    pub child_name: Option<String>,
    #[field(name = "birthDate")]
    pub birth_date: Option<String>,
    #[field(name = "deathName")]
    pub deceased_name: Option<String>,
    #[field(name = "deathDate")]
    pub death_date: Option<String>,
    #[field(name = "coupleName")]
    pub couple_name: Option<String>,
    #[field(name = "marriageYear")]
    pub marriage_year: Option<String>,
    #[field(name = "propertyNo")]
    pub property_number: Option<String>,
    #[field(name = "certificateName")]
    pub certificate_holder_name: Option<String>,
    #[field(name = "niradharName")]
    pub destitute_name: Option<String>,
    #[field(name = "paymentScreenshot")]
    pub payment_screenshot: Option<TempFile<'r>>,
}

impl DakhalaUpload<'_> {
    fn input(&self) -> FormInput {
        FormInput {
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            email: self.email.clone(),
            certificate_type: self.certificate_type.clone(),
            child_name: self.child_name.clone(),
            birth_date: self.birth_date.clone(),
            deceased_name: self.deceased_name.clone(),
            death_date: self.death_date.clone(),
            couple_name: self.couple_name.clone(),
            marriage_year: self.marriage_year.clone(),
            property_number: self.property_number.clone(),
            certificate_holder_name: self.certificate_holder_name.clone(),
            destitute_name: self.destitute_name.clone(),
        }
    }

    /// Copies every field into `form`. All text is applied even when one
    /// value is rejected, so the applicant's input survives; the first
    /// rejection is returned.
    pub async fn fill(
        &self,
        form: &mut CertificateRequestForm,
        max_bytes: usize,
    ) -> Result<(), ApiError> {
        let mut first_error = form.apply(&self.input()).err();

        if let Some(file) = self.payment_screenshot.as_ref().filter(|f| f.len() > 0) {
            match read_screenshot(file, max_bytes).await {
                Ok(proof) => form.attach_payment_proof(proof),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

async fn read_screenshot(
    file: &TempFile<'_>,
    max_bytes: usize,
) -> Result<PaymentProof, ValidationError> {
    let raw_name = file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string());
    let content_type = file.content_type().map(|ct| ct.to_string());

    debug!(
        "Payment screenshot: name={:?} content_type={:?} len={}",
        raw_name,
        content_type,
        file.len()
    );

    if file.len() > max_bytes as u64 {
        return Err(ValidationError::ProofTooLarge {
            limit_bytes: max_bytes,
        });
    }

    let mut bytes = Vec::with_capacity(file.len() as usize);
    let reader = file.open().await.map_err(|e| {
        error!("Failed to open uploaded screenshot: {}", e);
        ValidationError::UnsupportedProofType(raw_name.clone().unwrap_or_default())
    })?;
    tokio::pin!(reader);
    reader.read_to_end(&mut bytes).await.map_err(|e| {
        error!("Failed to read uploaded screenshot: {}", e);
        ValidationError::UnsupportedProofType(raw_name.clone().unwrap_or_default())
    })?;

    let file_name = raw_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "payment-screenshot".to_string());
    PaymentProof::new(file_name, content_type.as_deref(), bytes, max_bytes)
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(crate = "rocket::serde")]
pub struct Base64Screenshot {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    pub mime_type: String,
    #[validate(length(min = 1))]
    pub data: String,
}

/// Request form as JSON, the screenshot base64-encoded.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Base64CertificateRequest {
    #[serde(flatten)]
    pub form: FormInput,
    pub payment_screenshot: Option<Base64Screenshot>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    #[serde(rename = "type")]
    pub certificate_type: CertificateType,
    pub message: String,
}

// ============================================================================
// ENDPOINTS
// ============================================================================

#[openapi(tag = "Certificates")]
#[get("/certificates/types")]
pub fn list_certificate_types() -> Json<ApiResponse<Vec<CertificateTypeInfo>>> {
    Json(ApiResponse::success(catalogue()))
}

#[openapi(tag = "Certificates")]
#[post("/certificates/validate", data = "<input>")]
pub fn validate_certificate_request(
    input: Json<FormInput>,
) -> Result<Json<ApiResponse<ValidationReport>>, ApiError> {
    let mut form = CertificateRequestForm::new();
    form.apply(&input)?;
    Ok(Json(ApiResponse::success(ValidationReport::from(form.validate()))))
}

#[openapi(skip)]
#[post("/certificates/request", data = "<upload>")]
pub async fn submit_certificate_request(
    upload: Form<DakhalaUpload<'_>>,
    submitter: &State<SharedSubmitter>,
) -> Result<Json<ApiResponse<SubmissionReceipt>>, ApiError> {
    let mut form = CertificateRequestForm::new();
    upload.fill(&mut form, Config::max_screenshot_bytes()).await?;
    submit(form, submitter).await
}

#[openapi(tag = "Certificates")]
#[post("/certificates/request-base64", data = "<request>")]
pub async fn submit_certificate_request_base64(
    request: Json<Base64CertificateRequest>,
    submitter: &State<SharedSubmitter>,
) -> Result<Json<ApiResponse<SubmissionReceipt>>, ApiError> {
    let request = request.into_inner();
    let mut form = CertificateRequestForm::new();

    form.apply(&request.form)?;

    if let Some(screenshot) = request.payment_screenshot {
        screenshot
            .validate()
            .map_err(|e| ApiError::bad_request(format!("Invalid screenshot: {}", e)))?;

        let bytes = BASE64
            .decode(screenshot.data.as_bytes())
            .map_err(|_| ApiError::bad_request("Invalid base64 data"))?;

        form.attach_payment_proof(PaymentProof::new(
            screenshot.filename,
            Some(screenshot.mime_type.as_str()),
            bytes,
            Config::max_screenshot_bytes(),
        )?);
    }

    submit(form, submitter).await
}

async fn submit(
    mut form: CertificateRequestForm,
    submitter: &SharedSubmitter,
) -> Result<Json<ApiResponse<SubmissionReceipt>>, ApiError> {
    let outcome = form.submit(&**submitter).await;
    let notice = outcome.notice().text().to_string();

    match outcome {
        SubmissionOutcome::Accepted(confirmation) => {
            let certificate_type = form
                .state()
                .certificate_type
                .ok_or_else(|| ApiError::internal_error("Certificate type lost after submission"))?;
            Ok(Json(ApiResponse::success_with_message(
                notice,
                SubmissionReceipt {
                    reference: confirmation.reference,
                    certificate_type,
                    message: confirmation.message,
                },
            )))
        }
        SubmissionOutcome::Rejected(_) => Err(ApiError::bad_request(notice)),
        SubmissionOutcome::Failed(_) => Err(ApiError::bad_gateway(notice)),
    }
}
