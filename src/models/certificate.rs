use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::form::{FormField, ValidationError};

/// Fee charged for every fee-bearing certificate, in rupees.
pub const CERTIFICATE_FEE_RUPEES: u32 = 20;

/// Certificates the Gram Panchayat issues on request (दाखले).
///
/// Deserializes from either the English slug or the Marathi label the
/// public form submits; always serializes as the slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CertificateType {
    #[serde(rename = "birth", alias = "जन्म नोंद")]
    Birth,
    #[serde(rename = "death", alias = "मृत्यू नोंद")]
    Death,
    #[serde(rename = "marriage", alias = "विवाह नोंदणी दाखला")]
    Marriage,
    #[serde(rename = "property-extract", alias = "८ अ उतारा")]
    PropertyExtract,
    #[serde(rename = "below-poverty-line", alias = "दारिद्र्य रेषेखाली असल्याचा दाखला")]
    BelowPovertyLine,
    #[serde(rename = "dues-clearance", alias = "ग्रामपंचायत येणे बाकी दाखला")]
    DuesClearance,
    #[serde(rename = "destitute", alias = "निराधार असल्याचा दाखला मागणी")]
    Destitute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fee {
    Required { rupees: u32 },
    Exempt,
}

impl Fee {
    pub fn is_required(self) -> bool {
        matches!(self, Fee::Required { .. })
    }
}

/// One row of the certificate catalogue.
#[derive(Debug)]
pub struct CertificateRule {
    pub slug: &'static str,
    pub label: &'static str,
    pub required_fields: &'static [FormField],
    pub fee: Fee,
    pub missing_fields_message: &'static str,
}

static BIRTH: CertificateRule = CertificateRule {
    slug: "birth",
    label: "जन्म नोंद",
    required_fields: &[FormField::ChildName, FormField::BirthDate],
    fee: Fee::Required { rupees: CERTIFICATE_FEE_RUPEES },
    missing_fields_message: "जन्म नोंदीसाठी बाळाचे नाव आणि जन्मतारीख आवश्यक आहे.",
};

static DEATH: CertificateRule = CertificateRule {
    slug: "death",
    label: "मृत्यू नोंद",
    required_fields: &[FormField::DeceasedName, FormField::DeathDate],
    fee: Fee::Required { rupees: CERTIFICATE_FEE_RUPEES },
    missing_fields_message: "मृत्यू नोंदीसाठी मृत व्यक्तीचे नाव आणि मृत्यूची तारीख आवश्यक आहे.",
};

static MARRIAGE: CertificateRule = CertificateRule {
    slug: "marriage",
    label: "विवाह नोंदणी दाखला",
    required_fields: &[FormField::CoupleName, FormField::MarriageYear],
    fee: Fee::Required { rupees: CERTIFICATE_FEE_RUPEES },
    missing_fields_message: "विवाह दाखल्यासाठी दांपत्याचे नाव आणि नोंदणीचे वर्ष आवश्यक आहे.",
};

static PROPERTY_EXTRACT: CertificateRule = CertificateRule {
    slug: "property-extract",
    label: "८ अ उतारा",
    required_fields: &[FormField::PropertyNumber],
    fee: Fee::Required { rupees: CERTIFICATE_FEE_RUPEES },
    missing_fields_message: "८ अ उताऱ्यासाठी मिळकत नंबर आवश्यक आहे.",
};

static BELOW_POVERTY_LINE: CertificateRule = CertificateRule {
    slug: "below-poverty-line",
    label: "दारिद्र्य रेषेखाली असल्याचा दाखला",
    required_fields: &[FormField::CertificateHolderName],
    fee: Fee::Exempt,
    missing_fields_message: "या दाखल्यासाठी अर्जदाराचे संपूर्ण नाव आवश्यक आहे.",
};

static DUES_CLEARANCE: CertificateRule = CertificateRule {
    slug: "dues-clearance",
    label: "ग्रामपंचायत येणे बाकी दाखला",
    required_fields: &[FormField::CertificateHolderName],
    fee: Fee::Required { rupees: CERTIFICATE_FEE_RUPEES },
    missing_fields_message: "या दाखल्यासाठी अर्जदाराचे संपूर्ण नाव आवश्यक आहे.",
};

static DESTITUTE: CertificateRule = CertificateRule {
    slug: "destitute",
    label: "निराधार असल्याचा दाखला मागणी",
    required_fields: &[FormField::DestituteName],
    fee: Fee::Exempt,
    missing_fields_message: "निराधार दाखल्यासाठी संपूर्ण नाव आवश्यक आहे.",
};

impl CertificateType {
    /// Display order of the request form's dropdown.
    pub const ALL: [CertificateType; 7] = [
        CertificateType::Birth,
        CertificateType::Death,
        CertificateType::Marriage,
        CertificateType::PropertyExtract,
        CertificateType::BelowPovertyLine,
        CertificateType::DuesClearance,
        CertificateType::Destitute,
    ];

    pub fn rule(self) -> &'static CertificateRule {
        match self {
            CertificateType::Birth => &BIRTH,
            CertificateType::Death => &DEATH,
            CertificateType::Marriage => &MARRIAGE,
            CertificateType::PropertyExtract => &PROPERTY_EXTRACT,
            CertificateType::BelowPovertyLine => &BELOW_POVERTY_LINE,
            CertificateType::DuesClearance => &DUES_CLEARANCE,
            CertificateType::Destitute => &DESTITUTE,
        }
    }

    pub fn slug(self) -> &'static str {
        self.rule().slug
    }

    pub fn label(self) -> &'static str {
        self.rule().label
    }

    pub fn fee(self) -> Fee {
        self.rule().fee
    }

    pub fn is_fee_required(self) -> bool {
        self.fee().is_required()
    }

    pub fn required_fields(self) -> &'static [FormField] {
        self.rule().required_fields
    }

    pub fn missing_fields_message(self) -> &'static str {
        self.rule().missing_fields_message
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CertificateType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        CertificateType::ALL
            .into_iter()
            .find(|t| t.slug() == value || t.label() == value)
            .ok_or_else(|| ValidationError::UnknownCertificateType(value.to_string()))
    }
}

/// Catalogue entry as published by `GET /certificates/types`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateTypeInfo {
    #[serde(rename = "type")]
    pub certificate_type: CertificateType,
    pub label: String,
    pub required_fields: Vec<FormField>,
    pub fee: Fee,
}

impl From<CertificateType> for CertificateTypeInfo {
    fn from(certificate_type: CertificateType) -> Self {
        CertificateTypeInfo {
            certificate_type,
            label: certificate_type.label().to_string(),
            required_fields: certificate_type.required_fields().to_vec(),
            fee: certificate_type.fee(),
        }
    }
}

pub fn catalogue() -> Vec<CertificateTypeInfo> {
    CertificateType::ALL.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_type_has_at_least_one_specific_field() {
        for certificate in CertificateType::ALL {
            assert!(
                !certificate.required_fields().is_empty(),
                "{:?} has no type-specific fields",
                certificate
            );
        }
    }

    #[test]
    fn fee_partition_matches_the_published_rates() {
        let required: Vec<_> = CertificateType::ALL
            .into_iter()
            .filter(|t| t.is_fee_required())
            .collect();
        let exempt: Vec<_> = CertificateType::ALL
            .into_iter()
            .filter(|t| !t.is_fee_required())
            .collect();

        assert_eq!(
            required,
            vec![
                CertificateType::Birth,
                CertificateType::Death,
                CertificateType::Marriage,
                CertificateType::PropertyExtract,
                CertificateType::DuesClearance,
            ]
        );
        assert_eq!(
            exempt,
            vec![CertificateType::BelowPovertyLine, CertificateType::Destitute]
        );
        assert_eq!(
            CertificateType::Birth.fee(),
            Fee::Required { rupees: 20 }
        );
    }

    #[test]
    fn parses_slug_and_marathi_label() {
        assert_eq!("birth".parse::<CertificateType>(), Ok(CertificateType::Birth));
        assert_eq!("८ अ उतारा".parse::<CertificateType>(), Ok(CertificateType::PropertyExtract));
        assert_eq!(
            " निराधार असल्याचा दाखला मागणी ".parse::<CertificateType>(),
            Ok(CertificateType::Destitute)
        );
        assert_eq!(
            "passport".parse::<CertificateType>(),
            Err(ValidationError::UnknownCertificateType("passport".to_string()))
        );
    }

    #[test]
    fn serde_accepts_label_alias_and_writes_slug() {
        let parsed: CertificateType = serde_json::from_str("\"मृत्यू नोंद\"").unwrap();
        assert_eq!(parsed, CertificateType::Death);
        assert_eq!(
            serde_json::to_string(&CertificateType::DuesClearance).unwrap(),
            "\"dues-clearance\""
        );
    }

    #[test]
    fn slugs_and_labels_are_unique() {
        for (i, a) in CertificateType::ALL.iter().enumerate() {
            for b in &CertificateType::ALL[i + 1..] {
                assert_ne!(a.slug(), b.slug());
                assert_ne!(a.label(), b.label());
            }
        }
    }

    #[test]
    fn catalogue_lists_every_type_in_order() {
        let listed: Vec<_> = catalogue().into_iter().map(|c| c.certificate_type).collect();
        assert_eq!(listed, CertificateType::ALL.to_vec());
    }
}
