use log::warn;
use rocket::State;
use rocket::form::Form;
use rocket_dyn_templates::{Template, context};
use serde::Serialize;

use crate::config::Config;
use crate::models::{
    self, CERTIFICATE_FEE_RUPEES, CertificateType, FormField, VillageProfile, catalogue,
};
use crate::routes::certificate::DakhalaUpload;
use crate::services::{CertificateRequestForm, ContentService, Notice, SharedSubmitter};

/// Input box of the request form, shown only for the listed certificate types.
#[derive(Serialize)]
struct FieldView {
    name: &'static str,
    label: &'static str,
    input: &'static str,
    value: String,
    for_types: Vec<&'static str>,
}

fn field_views(form: &CertificateRequestForm) -> Vec<FieldView> {
    FormField::ALL
        .into_iter()
        .filter(|field| !matches!(field, FormField::Name | FormField::Mobile | FormField::Email | FormField::CertificateType))
        .map(|field| FieldView {
            name: field.wire_name(),
            label: field.label(),
            input: match field {
                FormField::BirthDate | FormField::DeathDate => "date",
                _ => "text",
            },
            value: form.state().text(field).unwrap_or_default().to_string(),
            for_types: CertificateType::ALL
                .into_iter()
                .filter(|t| t.required_fields().contains(&field))
                .map(CertificateType::slug)
                .collect(),
        })
        .collect()
}

fn render_dakhala(form: &CertificateRequestForm, notice: Option<&Notice>) -> Template {
    let state = form.state();
    Template::render(
        "dakhala",
        context! {
            village_name: Config::village_name(),
            certificates: catalogue(),
            selected: state.certificate_type.map(CertificateType::slug),
            name: state.text(FormField::Name).unwrap_or_default(),
            mobile: state.text(FormField::Mobile).unwrap_or_default(),
            email: state.text(FormField::Email).unwrap_or_default(),
            fields: field_views(form),
            fee_rupees: CERTIFICATE_FEE_RUPEES,
            qr_url: Config::payment_qr_url(),
            preview_url: form.preview().map(|p| p.url().to_string()),
            proof_name: state.payment_proof.as_ref().map(|p| p.file_name.clone()),
            notice: notice,
            submit_enabled: form.is_submit_enabled(),
        },
    )
}

#[get("/")]
pub async fn home(content: &State<ContentService>) -> Template {
    let works = content.development_works().await.unwrap_or_else(|e| {
        warn!("Home page without development works: {}", e);
        Vec::new()
    });
    let qr_codes = content.tax_qr_codes().await.unwrap_or_else(|e| {
        warn!("Home page without tax QR codes: {}", e);
        Default::default()
    });

    let village = VillageProfile::new(Config::village_name(), Config::taluka(), Config::district());

    Template::render(
        "index",
        context! {
            village_name: village.name.clone(),
            village: village,
            sections: models::SECTION_IDS,
            slogans: models::slogans(),
            works: works,
            officials: models::state_officials(),
            members: models::executive_members(),
            qr: qr_codes,
            certificates: catalogue(),
        },
    )
}

#[get("/dakhala")]
pub fn dakhala_page() -> Template {
    render_dakhala(&CertificateRequestForm::new(), None)
}

#[post("/dakhala", data = "<upload>")]
pub async fn submit_dakhala(
    upload: Form<DakhalaUpload<'_>>,
    submitter: &State<SharedSubmitter>,
) -> Template {
    let mut form = CertificateRequestForm::new();

    if let Err(e) = upload.fill(&mut form, Config::max_screenshot_bytes()).await {
        return render_dakhala(&form, Some(&Notice::Error(e.message)));
    }

    let outcome = form.submit(&***submitter).await;
    let notice = outcome.notice();

    if matches!(notice, Notice::Success(_)) {
        form.reset();
    }
    render_dakhala(&form, Some(&notice))
}
