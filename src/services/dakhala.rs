use log::{error, info, warn};
use serde::Serialize;

use crate::models::{
    CertificateRequest, Confirmation, FormField, FormInput, FormState, PaymentPreview, PaymentProof,
    SubmissionError, ValidationError,
};
use crate::services::submission::CertificateSubmitter;

const SUCCESS_NOTICE: &str = "आपला अर्ज यशस्वीरित्या पाठवला गेला ✅";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Submitting,
}

/// Transient message shown to the applicant after an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Refused locally; nothing was sent.
    Rejected(ValidationError),
    Accepted(Confirmation),
    Failed(SubmissionError),
}

impl SubmissionOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            SubmissionOutcome::Rejected(e) => Notice::Error(e.to_string()),
            SubmissionOutcome::Accepted(_) => Notice::Success(SUCCESS_NOTICE.to_string()),
            SubmissionOutcome::Failed(e) => Notice::Error(format!("अर्जात त्रुटी: {}", e)),
        }
    }
}

/// The certificate request ("दाखला मागणी") form: applicant input, the
/// attached payment proof with its preview, and the submission lifecycle.
#[derive(Debug)]
pub struct CertificateRequestForm {
    state: FormState,
    preview: Option<PaymentPreview>,
    phase: SubmissionPhase,
    notice: Option<Notice>,
}

impl Default for CertificateRequestForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateRequestForm {
    pub fn new() -> Self {
        CertificateRequestForm {
            state: FormState::default(),
            preview: None,
            phase: SubmissionPhase::Idle,
            notice: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn preview(&self) -> Option<&PaymentPreview> {
        self.preview.as_ref()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// The submit button is disabled while an attempt is in progress.
    pub fn is_submit_enabled(&self) -> bool {
        self.phase == SubmissionPhase::Idle
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        self.state.set(field, value)
    }

    /// Sets every field of `input`. All text is applied even when one value
    /// is rejected, so the applicant's input survives; the first rejection
    /// is returned.
    pub fn apply(&mut self, input: &FormInput) -> Result<(), ValidationError> {
        let mut first_error = None;
        for (field, value) in input.fields() {
            if let Err(e) = self.set_field(field, value.unwrap_or_default()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Attaches (or replaces) the payment screenshot. The previous preview
    /// is dropped with the previous proof.
    pub fn attach_payment_proof(&mut self, proof: PaymentProof) {
        self.preview = Some(proof.preview());
        self.state.payment_proof = Some(proof);
    }

    pub fn clear_payment_proof(&mut self) {
        self.preview = None;
        self.state.payment_proof = None;
    }

    pub fn validate(&self) -> Result<CertificateRequest, ValidationError> {
        self.state.validate()
    }

    /// Validates and, when valid, hands the request to `submitter` once.
    /// Entered data is kept whatever the outcome.
    pub async fn submit(&mut self, submitter: &dyn CertificateSubmitter) -> SubmissionOutcome {
        self.phase = SubmissionPhase::Validating;

        let outcome = match self.validate() {
            Err(e) => {
                warn!("Certificate request refused: {}", e.code());
                SubmissionOutcome::Rejected(e)
            }
            Ok(request) => {
                self.phase = SubmissionPhase::Submitting;
                let certificate = request.certificate_type().slug();

                match submitter.submit(&request).await {
                    Ok(confirmation) => {
                        info!(
                            "Certificate request accepted: type={} reference={}",
                            certificate, confirmation.reference
                        );
                        SubmissionOutcome::Accepted(confirmation)
                    }
                    Err(e) => {
                        error!("Certificate request failed: type={} error={}", certificate, e);
                        SubmissionOutcome::Failed(e)
                    }
                }
            }
        };

        self.phase = SubmissionPhase::Idle;
        self.notice = Some(outcome.notice());
        outcome
    }

    /// Clears everything, including the attached proof and its preview.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CertificateType, ProofImageType};
    use crate::services::submission::MockCertificateSubmitter;
    use pretty_assertions::assert_eq;

    fn proof(name: &str, bytes: &[u8]) -> PaymentProof {
        PaymentProof::new(name, Some("image/png"), bytes.to_vec(), 1024).unwrap()
    }

    fn birth_form() -> CertificateRequestForm {
        let mut form = CertificateRequestForm::new();
        form.set_field(FormField::Name, "सुनील पाटील").unwrap();
        form.set_field(FormField::Email, "sunil@example.com").unwrap();
        form.set_field(FormField::CertificateType, "जन्म नोंद").unwrap();
        form.set_field(FormField::ChildName, "आर्या").unwrap();
        form.set_field(FormField::BirthDate, "2024-01-26").unwrap();
        form
    }

    #[test]
    fn new_form_is_empty_and_idle() {
        let form = CertificateRequestForm::new();
        assert_eq!(form.state(), &FormState::default());
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert!(form.is_submit_enabled());
        assert!(form.preview().is_none());
        assert!(form.notice().is_none());
    }

    #[test]
    fn replacing_proof_replaces_preview() {
        let mut form = CertificateRequestForm::new();
        form.attach_payment_proof(proof("first.png", &[1]));
        let first = form.preview().cloned().unwrap();

        form.attach_payment_proof(proof("second.png", &[2]));
        let second = form.preview().cloned().unwrap();

        assert_ne!(first, second);
        assert_eq!(second.url(), "data:image/png;base64,Ag==");
        assert_eq!(
            form.state().payment_proof.as_ref().map(|p| p.image_type),
            Some(ProofImageType::Png)
        );

        form.clear_payment_proof();
        assert!(form.preview().is_none());
        assert!(form.state().payment_proof.is_none());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_office() {
        let mut submitter = MockCertificateSubmitter::new();
        submitter.expect_submit().never();

        let mut form = birth_form();
        let outcome = form.submit(&submitter).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(ValidationError::MissingPaymentProof {
                certificate: CertificateType::Birth,
                rupees: 20,
            })
        );
        assert!(matches!(form.notice(), Some(Notice::Error(_))));
        assert!(form.is_submit_enabled());
    }

    #[tokio::test]
    async fn accepted_request_shows_success_and_reenables_submit() {
        let mut submitter = MockCertificateSubmitter::new();
        submitter
            .expect_submit()
            .withf(|request| request.certificate_type() == CertificateType::Birth)
            .times(1)
            .returning(|_| Ok(Confirmation::new("स्वीकारला")));

        let mut form = birth_form();
        form.attach_payment_proof(proof("upi.png", &[1, 2, 3]));
        let outcome = form.submit(&submitter).await;

        assert!(matches!(outcome, SubmissionOutcome::Accepted(_)));
        assert_eq!(
            form.notice(),
            Some(&Notice::Success("आपला अर्ज यशस्वीरित्या पाठवला गेला ✅".to_string()))
        );
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert!(form.is_submit_enabled());
    }

    #[tokio::test]
    async fn failed_request_keeps_entered_data() {
        let mut submitter = MockCertificateSubmitter::new();
        submitter.expect_submit().times(1).returning(|_| {
            Err(SubmissionError::SubmissionFailed(
                "सर्व्हर प्रतिसाद देऊ शकला नाही.".to_string(),
            ))
        });

        let mut form = birth_form();
        form.attach_payment_proof(proof("upi.png", &[1, 2, 3]));
        let before = form.state().clone();

        let outcome = form.submit(&submitter).await;

        assert!(matches!(outcome, SubmissionOutcome::Failed(_)));
        assert_eq!(
            form.notice().map(Notice::text),
            Some("अर्जात त्रुटी: सर्व्हर प्रतिसाद देऊ शकला नाही.")
        );
        assert_eq!(form.state(), &before);
        assert!(form.preview().is_some());
        assert!(form.is_submit_enabled());
    }

    #[tokio::test]
    async fn each_attempt_submits_once() {
        let mut submitter = MockCertificateSubmitter::new();
        submitter
            .expect_submit()
            .times(2)
            .returning(|_| Err(SubmissionError::SubmissionFailed("down".to_string())));

        let mut form = birth_form();
        form.attach_payment_proof(proof("upi.png", &[1]));
        form.submit(&submitter).await;
        form.submit(&submitter).await;
    }

    #[test]
    fn input_is_applied_field_by_field() {
        let input: FormInput = serde_json::from_str(
            r#"{
                "name": "सुनील", "mobile": "", "email": "s@example.com",
                "type": "दारिद्र्य रेषेखाली असल्याचा दाखला",
                "childName": "", "certificateName": "सुनील पाटील"
            }"#,
        )
        .unwrap();

        let mut form = CertificateRequestForm::new();
        form.apply(&input).unwrap();
        assert_eq!(form.state().certificate_type, Some(CertificateType::BelowPovertyLine));
        assert_eq!(form.state().text(FormField::Mobile), None);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn unknown_type_in_input_is_reported_and_other_fields_kept() {
        let input: FormInput =
            serde_json::from_str(r#"{"name": "a", "email": "a@b.in", "type": "passport"}"#)
                .unwrap();

        let mut form = CertificateRequestForm::new();
        assert_eq!(
            form.apply(&input),
            Err(ValidationError::UnknownCertificateType("passport".to_string()))
        );
        assert_eq!(form.state().text(FormField::Name), Some("a"));
        assert_eq!(form.state().text(FormField::Email), Some("a@b.in"));
        assert_eq!(form.state().certificate_type, None);
    }

    #[test]
    fn reset_discards_everything() {
        let mut form = birth_form();
        form.attach_payment_proof(proof("upi.png", &[1]));
        form.reset();
        assert_eq!(form.state(), &FormState::default());
        assert!(form.preview().is_none());
    }
}
