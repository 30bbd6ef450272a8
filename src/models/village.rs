use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Anchors of the home page, in page order.
pub const SECTION_IDS: [&str; 10] = [
    "home",
    "about",
    "development",
    "services",
    "certificates",
    "tax",
    "members",
    "officials",
    "places",
    "contact",
];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImageRef {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DevelopmentWork {
    pub image: ImageRef,
    pub title: String,
    pub description: String,
}

/// Tax payment QR codes: water tax (पाणीपट्टी) and house tax (घरपट्टी).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaxQrCodes {
    #[serde(rename = "panipattiQR")]
    pub water_tax: Option<ImageRef>,
    #[serde(rename = "gharPattiQR")]
    pub house_tax: Option<ImageRef>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Stat {
    pub icon: String,
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Member {
    pub name: String,
    pub phone: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Official {
    pub name: String,
    pub designation: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct VillageProfile {
    pub name: String,
    pub taluka: String,
    pub district: String,
    pub stats: Vec<Stat>,
    pub about: Vec<String>,
}

impl VillageProfile {
    pub fn new(name: String, taluka: String, district: String) -> Self {
        let about = vec![
            format!(
                "{name} हे महाराष्ट्र राज्यातील {district} जिल्ह्यातील {taluka} तालुक्यातील एक प्रगतशील व ऐतिहासिक गाव आहे. \
                 २०११ च्या जनगणनेनुसार या गावाची लोकसंख्या सुमारे 3711 आहे. गावामध्ये जिल्हा परिषद प्राथमिक शाळा 4, \
                 अंगणवाडी केंद्रे 8, माध्यमिक विद्यालय 1, वाचनालय 1, व्यायामशाळा 1 अशी शैक्षणिक व शारीरिक सुविधा उपलब्ध आहेत. \
                 तसेच गणपती मंदिर हे प्रसिद्ध देवस्थान आहे."
            ),
            format!(
                "गावातील बहुतांश लोकांचा मुख्य व्यवसाय शेती असून अधिकतर ज्वारी, गहू, डाळिंब, ऊस ही प्रमुख पिके घेतली जातात. \
                 {name} ग्रामपंचायतीत विविध शासकीय योजना प्रभावीपणे राबविल्या गेल्या आहेत. \
                 स्वच्छ भारत अभियान अंतर्गत गावाने संपूर्ण खुले शौचमुक्त (ODF+) दर्जा मिळवला आहे."
            ),
        ];

        VillageProfile {
            name,
            taluka,
            district,
            stats: stats(),
            about,
        }
    }
}

fn stat(icon: &str, number: &str, label: &str) -> Stat {
    Stat {
        icon: icon.to_string(),
        number: number.to_string(),
        label: label.to_string(),
    }
}

pub fn stats() -> Vec<Stat> {
    vec![
        stat("🌾", "2200", "हेक्टर क्षेत्रफळ"),
        stat("🏘", "4", "वार्ड संख्या"),
        stat("👥", "3,711", "एकूण लोकसंख्या"),
        stat("🏠", "758", "कुटुंब संख्या"),
    ]
}

fn member(name: &str, phone: &str, image: &str) -> Member {
    Member {
        name: name.to_string(),
        phone: phone.to_string(),
        image: image.to_string(),
    }
}

/// Elected executive board (कार्यकारी मंडळ).
pub fn executive_members() -> Vec<Member> {
    vec![
        member("श्री. विकास कचरू शेटे", "+91 9876543210", "https://randomuser.me/api/portraits/men/45.jpg"),
        member("श्री. रमेश कुंडलिक पुंडे", "+91 9123456789", "https://randomuser.me/api/portraits/men/46.jpg"),
        member("श्री. खंडू भोमा मेंगाळ", "+91 9988776655", "https://randomuser.me/api/portraits/men/47.jpg"),
        member("श्रीमती. बेबीताई दत्तात्रय शेटे", "+91 9876123456", "https://randomuser.me/api/portraits/women/48.jpg"),
        member("श्रीमती. शैला मंगेश शेटे", "+91 9123459876", "https://randomuser.me/api/portraits/women/49.jpg"),
        member("श्रीमती. उज्वला साहेबराव घुले", "+91 9988123456", "https://randomuser.me/api/portraits/women/50.jpg"),
        member("श्रीमती. नानीबाई साहेबराव मेंगाळ", "+91 9876543219", "https://randomuser.me/api/portraits/women/51.jpg"),
    ]
}

fn official(designation: &str, name: &str, image: &str) -> Official {
    Official {
        name: name.to_string(),
        designation: designation.to_string(),
        image: image.to_string(),
    }
}

/// State Rural Development & Panchayat Raj leadership.
pub fn state_officials() -> Vec<Official> {
    vec![
        official("माननीय मुख्यमंत्री", "श्री. देवेंद्र फडणवीस", "/static/images/devendraFadanwis.webp"),
        official("माननीय उपमुख्यमंत्री", "श्री. एकनाथ शिंदे", "/static/images/yeknathShinde.jpeg"),
        official("माननीय उपमुख्यमंत्री", "श्री. अजित पवार", "/static/images/ajitPawar.jpeg"),
        official("माननीय मंत्री, ग्रामविकास व पंचायतराज विभाग", "श्री. जयकुमार गोरे", "/static/images/jayKumar.jpeg"),
        official("माननीय राज्यमंत्री, ग्रामविकास व पंचायतराज विभाग", "श्री. योगेश कदम", "/static/images/yogeshKadam.png"),
        official("प्रधान सचिव, ग्रामविकास व पंचायतराज विभाग", "श्री. एकनाथ डुबळे", "/static/images/yeknathDwale.png"),
    ]
}

pub fn slogans() -> Vec<String> {
    [
        "एकच ध्येय, स्वच्छ आणि समृद्ध गाव!",
        "चला, एकत्र येऊया, गाव सुंदर बनवूया!",
        "ग्रामपंचायत: गाव विकासाचे केंद्र!",
        "आपला ग्रामविकास, आपले योगदान!",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn work(image: &str, title: &str, description: &str) -> DevelopmentWork {
    DevelopmentWork {
        image: ImageRef {
            url: image.to_string(),
        },
        title: title.to_string(),
        description: description.to_string(),
    }
}

/// Served when no upstream content API is configured.
pub fn default_development_works() -> Vec<DevelopmentWork> {
    vec![
        work(
            "/static/images/devworks/road.jpg",
            "सिमेंट काँक्रीट रस्ता",
            "वार्ड क्र. २ मधील अंतर्गत रस्त्याचे काँक्रीटीकरण पूर्ण.",
        ),
        work(
            "/static/images/devworks/water-tank.jpg",
            "जलजीवन मिशन पाणी टाकी",
            "हर घर जल योजनेअंतर्गत नवीन पाणी साठवण टाकीचे बांधकाम.",
        ),
        work(
            "/static/images/devworks/school.jpg",
            "जिल्हा परिषद शाळा दुरुस्ती",
            "शाळेच्या वर्गखोल्यांची दुरुस्ती व रंगकाम.",
        ),
    ]
}

pub fn default_tax_qr_codes() -> TaxQrCodes {
    TaxQrCodes {
        water_tax: Some(ImageRef {
            url: "/static/images/qr/panipatti.png".to_string(),
        }),
        house_tax: Some(ImageRef {
            url: "/static/images/qr/gharpatti.png".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_configured_names() {
        let profile = VillageProfile::new(
            "गोमेवाडी".to_string(),
            "आटपाडी".to_string(),
            "सांगली".to_string(),
        );
        assert_eq!(profile.stats.len(), 4);
        assert!(profile.about[0].starts_with("गोमेवाडी हे"));
        assert!(profile.about[0].contains("सांगली जिल्ह्यातील आटपाडी तालुक्यातील"));
    }

    #[test]
    fn qr_codes_use_legacy_keys() {
        let json = serde_json::to_value(default_tax_qr_codes()).unwrap();
        assert_eq!(json["panipattiQR"]["url"], "/static/images/qr/panipatti.png");
        assert_eq!(json["gharPattiQR"]["url"], "/static/images/qr/gharpatti.png");
    }
}
