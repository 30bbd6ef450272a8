use chrono::NaiveDate;
use data_encoding::BASE64;
use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::certificate::{CertificateType, Fee};
use crate::utils::{upload, validation};

// ============================================================================
// FIELDS
// ============================================================================

/// Textual attributes of a certificate request, named as the public form
/// posts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FormField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "mobile")]
    Mobile,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "type")]
    CertificateType,
    #[serde(rename = "childName")]
    ChildName,
    #[serde(rename = "birthDate")]
    BirthDate,
    #[serde(rename = "deathName")]
    DeceasedName,
    #[serde(rename = "deathDate")]
    DeathDate,
    #[serde(rename = "coupleName")]
    CoupleName,
    #[serde(rename = "marriageYear")]
    MarriageYear,
    #[serde(rename = "propertyNo")]
    PropertyNumber,
    #[serde(rename = "certificateName")]
    CertificateHolderName,
    #[serde(rename = "niradharName")]
    DestituteName,
}

impl FormField {
    pub const ALL: [FormField; 13] = [
        FormField::Name,
        FormField::Mobile,
        FormField::Email,
        FormField::CertificateType,
        FormField::ChildName,
        FormField::BirthDate,
        FormField::DeceasedName,
        FormField::DeathDate,
        FormField::CoupleName,
        FormField::MarriageYear,
        FormField::PropertyNumber,
        FormField::CertificateHolderName,
        FormField::DestituteName,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Mobile => "mobile",
            FormField::Email => "email",
            FormField::CertificateType => "type",
            FormField::ChildName => "childName",
            FormField::BirthDate => "birthDate",
            FormField::DeceasedName => "deathName",
            FormField::DeathDate => "deathDate",
            FormField::CoupleName => "coupleName",
            FormField::MarriageYear => "marriageYear",
            FormField::PropertyNumber => "propertyNo",
            FormField::CertificateHolderName => "certificateName",
            FormField::DestituteName => "niradharName",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "नाव",
            FormField::Mobile => "मोबाईल नंबर",
            FormField::Email => "ईमेल",
            FormField::CertificateType => "दाखला प्रकार",
            FormField::ChildName => "बाळाचे संपूर्ण नाव",
            FormField::BirthDate => "जन्मतारीख",
            FormField::DeceasedName => "मृत व्यक्तीचे नाव",
            FormField::DeathDate => "मृत्यूची तारीख",
            FormField::CoupleName => "दांपत्याचे संपूर्ण नाव",
            FormField::MarriageYear => "विवाह नोंदणीचे वर्ष",
            FormField::PropertyNumber => "मिळकत नंबर",
            FormField::CertificateHolderName => "ज्याच्या नावे दाखला आवश्यक आहे त्याचे संपूर्ण नाव",
            FormField::DestituteName => "निराधाराचे संपूर्ण नाव",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Reasons a request is refused before anything is sent to the office.
/// The display text is the notice shown to the applicant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("कृपया आपले नाव, ईमेल आणि आवश्यक दाखल्याचा प्रकार निवडा.")]
    MissingRequiredField(Vec<FormField>),

    #[error("{}", .certificate.missing_fields_message())]
    MissingTypeSpecificField {
        certificate: CertificateType,
        fields: Vec<FormField>,
    },

    #[error("हा दाखला मिळवण्यासाठी ₹{rupees} चे शुल्क भरून स्क्रीनशॉट अपलोड करा.")]
    MissingPaymentProof {
        certificate: CertificateType,
        rupees: u32,
    },

    #[error("{reason}")]
    InvalidField {
        field: FormField,
        reason: &'static str,
    },

    #[error("अज्ञात दाखला प्रकार: {0}")]
    UnknownCertificateType(String),

    #[error("फक्त .jpg किंवा .png स्वरूपातील स्क्रीनशॉट स्वीकारला जातो.")]
    UnsupportedProofType(String),

    #[error("स्क्रीनशॉटचा आकार {} MB पेक्षा जास्त नसावा.", .limit_bytes / (1024 * 1024))]
    ProofTooLarge { limit_bytes: usize },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField(_) => "missing_required_field",
            ValidationError::MissingTypeSpecificField { .. } => "missing_type_specific_field",
            ValidationError::MissingPaymentProof { .. } => "missing_payment_proof",
            ValidationError::InvalidField { .. } => "invalid_field",
            ValidationError::UnknownCertificateType(_) => "unknown_certificate_type",
            ValidationError::UnsupportedProofType(_) => "unsupported_proof_type",
            ValidationError::ProofTooLarge { .. } => "proof_too_large",
        }
    }

    /// Fields the applicant has to fill in or correct.
    pub fn fields(&self) -> Vec<FormField> {
        match self {
            ValidationError::MissingRequiredField(fields)
            | ValidationError::MissingTypeSpecificField { fields, .. } => fields.clone(),
            ValidationError::InvalidField { field, .. } => vec![*field],
            ValidationError::UnknownCertificateType(_) => vec![FormField::CertificateType],
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// PAYMENT PROOF
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProofImageType {
    Jpeg,
    Png,
}

impl ProofImageType {
    pub fn mime(self) -> &'static str {
        match self {
            ProofImageType::Jpeg => "image/jpeg",
            ProofImageType::Png => "image/png",
        }
    }

    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let extension = content_type
            .and_then(upload::extension_from_content_type)
            .or_else(|| file_name.and_then(upload::get_extension_from_filename))?;

        match extension.as_str() {
            "jpg" | "jpeg" => Some(ProofImageType::Jpeg),
            "png" => Some(ProofImageType::Png),
            _ => None,
        }
    }
}

/// Screenshot of the UPI fee payment, held in memory for the lifetime of
/// the form.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub file_name: String,
    pub image_type: ProofImageType,
    pub bytes: Vec<u8>,
}

impl PaymentProof {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
        max_bytes: usize,
    ) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        let image_type = ProofImageType::detect(Some(&file_name), content_type)
            .ok_or_else(|| ValidationError::UnsupportedProofType(file_name.clone()))?;

        if bytes.len() > max_bytes {
            return Err(ValidationError::ProofTooLarge {
                limit_bytes: max_bytes,
            });
        }

        Ok(PaymentProof {
            file_name,
            image_type,
            bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn preview(&self) -> PaymentPreview {
        PaymentPreview(format!(
            "data:{};base64,{}",
            self.image_type.mime(),
            self.to_base64()
        ))
    }
}

impl fmt::Debug for PaymentProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProof")
            .field("file_name", &self.file_name)
            .field("image_type", &self.image_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Inline preview of an attached proof.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentPreview(String);

impl PaymentPreview {
    pub fn url(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PaymentPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaymentPreview({} bytes)", self.0.len())
    }
}

// ============================================================================
// FORM STATE
// ============================================================================

/// Request body as the public form posts it. Nothing is interpreted until
/// the fields are set on a form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FormInput {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    /// Slug or Marathi label of the certificate.
    #[serde(rename = "type")]
    pub certificate_type: Option<String>,
    pub child_name: Option<String>,
    pub birth_date: Option<String>,
    #[serde(rename = "deathName")]
    pub deceased_name: Option<String>,
    pub death_date: Option<String>,
    pub couple_name: Option<String>,
    pub marriage_year: Option<String>,
    #[serde(rename = "propertyNo")]
    pub property_number: Option<String>,
    #[serde(rename = "certificateName")]
    pub certificate_holder_name: Option<String>,
    #[serde(rename = "niradharName")]
    pub destitute_name: Option<String>,
}

impl FormInput {
    pub fn fields(&self) -> [(FormField, Option<&str>); 13] {
        [
            (FormField::Name, self.name.as_deref()),
            (FormField::Mobile, self.mobile.as_deref()),
            (FormField::Email, self.email.as_deref()),
            (FormField::CertificateType, self.certificate_type.as_deref()),
            (FormField::ChildName, self.child_name.as_deref()),
            (FormField::BirthDate, self.birth_date.as_deref()),
            (FormField::DeceasedName, self.deceased_name.as_deref()),
            (FormField::DeathDate, self.death_date.as_deref()),
            (FormField::CoupleName, self.couple_name.as_deref()),
            (FormField::MarriageYear, self.marriage_year.as_deref()),
            (FormField::PropertyNumber, self.property_number.as_deref()),
            (FormField::CertificateHolderName, self.certificate_holder_name.as_deref()),
            (FormField::DestituteName, self.destitute_name.as_deref()),
        ]
    }
}

/// Applicant input as typed into the request form. Blank strings count as
/// absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub certificate_type: Option<CertificateType>,
    pub child_name: Option<String>,
    pub birth_date: Option<String>,
    pub deceased_name: Option<String>,
    pub death_date: Option<String>,
    pub couple_name: Option<String>,
    pub marriage_year: Option<String>,
    pub property_number: Option<String>,
    pub certificate_holder_name: Option<String>,
    pub destitute_name: Option<String>,
    pub payment_proof: Option<PaymentProof>,
}

impl FormState {
    /// Trimmed value of a field, `None` when blank.
    pub fn text(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::CertificateType => return self.certificate_type.map(CertificateType::slug),
            FormField::Name => &self.name,
            FormField::Mobile => &self.mobile,
            FormField::Email => &self.email,
            FormField::ChildName => &self.child_name,
            FormField::BirthDate => &self.birth_date,
            FormField::DeceasedName => &self.deceased_name,
            FormField::DeathDate => &self.death_date,
            FormField::CoupleName => &self.couple_name,
            FormField::MarriageYear => &self.marriage_year,
            FormField::PropertyNumber => &self.property_number,
            FormField::CertificateHolderName => &self.certificate_holder_name,
            FormField::DestituteName => &self.destitute_name,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    fn text_slot(&mut self, field: FormField) -> Option<&mut Option<String>> {
        let slot = match field {
            FormField::CertificateType => return None,
            FormField::Name => &mut self.name,
            FormField::Mobile => &mut self.mobile,
            FormField::Email => &mut self.email,
            FormField::ChildName => &mut self.child_name,
            FormField::BirthDate => &mut self.birth_date,
            FormField::DeceasedName => &mut self.deceased_name,
            FormField::DeathDate => &mut self.death_date,
            FormField::CoupleName => &mut self.couple_name,
            FormField::MarriageYear => &mut self.marriage_year,
            FormField::PropertyNumber => &mut self.property_number,
            FormField::CertificateHolderName => &mut self.certificate_holder_name,
            FormField::DestituteName => &mut self.destitute_name,
        };
        Some(slot)
    }

    /// Stores one field. An unrecognised certificate type clears the
    /// selection and is reported back.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();

        if field == FormField::CertificateType {
            self.certificate_type = None;
            if !value.is_empty() {
                self.certificate_type = Some(value.parse()?);
            }
            return Ok(());
        }

        if let Some(slot) = self.text_slot(field) {
            *slot = (!value.is_empty()).then(|| value.to_string());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<CertificateRequest, ValidationError> {
        validate(self)
    }
}

// ============================================================================
// VALIDATED REQUEST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Applicant {
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
}

/// Type-specific payload of a request; each case carries only its own
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CertificateDetails {
    Birth {
        child_name: String,
        birth_date: NaiveDate,
    },
    Death {
        deceased_name: String,
        death_date: NaiveDate,
    },
    Marriage {
        couple_name: String,
        marriage_year: String,
    },
    PropertyExtract {
        property_number: String,
    },
    BelowPovertyLine {
        holder_name: String,
    },
    DuesClearance {
        holder_name: String,
    },
    Destitute {
        destitute_name: String,
    },
}

impl CertificateDetails {
    pub fn certificate_type(&self) -> CertificateType {
        match self {
            CertificateDetails::Birth { .. } => CertificateType::Birth,
            CertificateDetails::Death { .. } => CertificateType::Death,
            CertificateDetails::Marriage { .. } => CertificateType::Marriage,
            CertificateDetails::PropertyExtract { .. } => CertificateType::PropertyExtract,
            CertificateDetails::BelowPovertyLine { .. } => CertificateType::BelowPovertyLine,
            CertificateDetails::DuesClearance { .. } => CertificateType::DuesClearance,
            CertificateDetails::Destitute { .. } => CertificateType::Destitute,
        }
    }

    fn from_state(certificate: CertificateType, state: &FormState) -> Result<Self, ValidationError> {
        let field = |field: FormField| -> Result<String, ValidationError> {
            state
                .text(field)
                .map(str::to_string)
                .ok_or_else(|| ValidationError::MissingTypeSpecificField {
                    certificate,
                    fields: vec![field],
                })
        };
        let date = |name: FormField| -> Result<NaiveDate, ValidationError> {
            let raw = field(name)?;
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidField {
                field: name,
                reason: "तारीख YYYY-MM-DD स्वरूपात असावी.",
            })
        };

        let details = match certificate {
            CertificateType::Birth => CertificateDetails::Birth {
                child_name: field(FormField::ChildName)?,
                birth_date: date(FormField::BirthDate)?,
            },
            CertificateType::Death => CertificateDetails::Death {
                deceased_name: field(FormField::DeceasedName)?,
                death_date: date(FormField::DeathDate)?,
            },
            CertificateType::Marriage => CertificateDetails::Marriage {
                couple_name: field(FormField::CoupleName)?,
                marriage_year: field(FormField::MarriageYear)?,
            },
            CertificateType::PropertyExtract => CertificateDetails::PropertyExtract {
                property_number: field(FormField::PropertyNumber)?,
            },
            CertificateType::BelowPovertyLine => CertificateDetails::BelowPovertyLine {
                holder_name: field(FormField::CertificateHolderName)?,
            },
            CertificateType::DuesClearance => CertificateDetails::DuesClearance {
                holder_name: field(FormField::CertificateHolderName)?,
            },
            CertificateType::Destitute => CertificateDetails::Destitute {
                destitute_name: field(FormField::DestituteName)?,
            },
        };
        Ok(details)
    }
}

/// A request that passed every check and may be handed to the office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub applicant: Applicant,
    pub details: CertificateDetails,
    pub payment_proof: Option<PaymentProof>,
}

impl CertificateRequest {
    pub fn certificate_type(&self) -> CertificateType {
        self.details.certificate_type()
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Checks, in order: name/email/type presence, the email format, presence
/// of the type-specific fields from the catalogue, the date formats of those
/// fields, then the payment proof for fee-bearing certificates. The mobile
/// number is optional and never refused; a recognisable Indian mobile is
/// stored in its bare ten-digit form.
pub fn validate(state: &FormState) -> Result<CertificateRequest, ValidationError> {
    let name = state.text(FormField::Name);
    let email = state.text(FormField::Email);

    let (Some(name), Some(email), Some(certificate)) = (name, email, state.certificate_type) else {
        let missing = [FormField::Name, FormField::Email, FormField::CertificateType]
            .into_iter()
            .filter(|field| state.text(*field).is_none())
            .collect();
        return Err(ValidationError::MissingRequiredField(missing));
    };

    if !validation::validate_email(email) {
        return Err(ValidationError::InvalidField {
            field: FormField::Email,
            reason: "कृपया वैध ईमेल पत्ता टाका.",
        });
    }

    let missing: Vec<FormField> = certificate
        .required_fields()
        .iter()
        .copied()
        .filter(|field| state.text(*field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingTypeSpecificField {
            certificate,
            fields: missing,
        });
    }

    let details = CertificateDetails::from_state(certificate, state)?;

    if let Fee::Required { rupees } = certificate.fee() {
        if state.payment_proof.is_none() {
            return Err(ValidationError::MissingPaymentProof {
                certificate,
                rupees,
            });
        }
    }

    Ok(CertificateRequest {
        applicant: Applicant {
            name: name.to_string(),
            email: email.to_string(),
            mobile: state.text(FormField::Mobile).map(validation::normalize_mobile),
        },
        details,
        payment_proof: state.payment_proof.clone(),
    })
}

/// Validation outcome as reported by `POST /certificates/validate`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub fields: Vec<FormField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CertificateDetails>,
}

impl From<Result<CertificateRequest, ValidationError>> for ValidationReport {
    fn from(result: Result<CertificateRequest, ValidationError>) -> Self {
        match result {
            Ok(request) => ValidationReport {
                valid: true,
                code: None,
                message: None,
                fields: Vec::new(),
                details: Some(request.details),
            },
            Err(error) => ValidationReport {
                valid: false,
                code: Some(error.code().to_string()),
                message: Some(error.to_string()),
                fields: error.fields(),
                details: None,
            },
        }
    }
}
