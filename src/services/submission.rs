use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Applicant, CertificateDetails, CertificateRequest, Confirmation, SubmissionError};

const ACCEPTED_MESSAGE: &str = "अर्ज यशस्वीरित्या स्वीकारला गेला आणि प्रक्रिया सुरू आहे.";
const UNREACHABLE_MESSAGE: &str = "सर्व्हर प्रतिसाद देऊ शकला नाही. कृपया पुन्हा प्रयत्न करा.";

/// Receives validated certificate requests on behalf of the Panchayat office.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateSubmitter: Send + Sync {
    async fn submit(&self, request: &CertificateRequest) -> Result<Confirmation, SubmissionError>;
}

pub type SharedSubmitter = Arc<dyn CertificateSubmitter>;

/// Picks the HTTP forwarder when `submission_endpoint` is configured,
/// otherwise the simulated office.
pub fn from_config() -> SharedSubmitter {
    match Config::submission_endpoint() {
        Some(endpoint) => Arc::new(HttpSubmitter::new(endpoint)),
        None => Arc::new(SimulatedBackend::new(
            Config::submission_delay(),
            Config::submission_failure_rate(),
        )),
    }
}

// ============================================================================
// SIMULATED BACKEND
// ============================================================================

/// Stand-in office: answers after a fixed delay and fails at random.
pub struct SimulatedBackend {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedBackend {
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        SimulatedBackend {
            delay,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl CertificateSubmitter for SimulatedBackend {
    async fn submit(&self, request: &CertificateRequest) -> Result<Confirmation, SubmissionError> {
        debug!(
            "Simulating submission of {} request (delay {:?})",
            request.certificate_type().slug(),
            self.delay
        );
        tokio::time::sleep(self.delay).await;

        if rand::random::<f64>() < self.failure_rate {
            return Err(SubmissionError::SubmissionFailed(UNREACHABLE_MESSAGE.to_string()));
        }

        Ok(Confirmation::new(ACCEPTED_MESSAGE))
    }
}

// ============================================================================
// HTTP FORWARDER
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionPayload<'a> {
    applicant: &'a Applicant,
    details: &'a CertificateDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_screenshot: Option<ScreenshotPayload<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenshotPayload<'a> {
    filename: &'a str,
    mime_type: &'static str,
    data: String,
}

#[derive(Deserialize)]
struct UpstreamReply {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    reference: Option<Uuid>,
}

/// Forwards requests as JSON to a remote office endpoint.
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpSubmitter {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CertificateSubmitter for HttpSubmitter {
    async fn submit(&self, request: &CertificateRequest) -> Result<Confirmation, SubmissionError> {
        let payload = SubmissionPayload {
            applicant: &request.applicant,
            details: &request.details,
            payment_screenshot: request.payment_proof.as_ref().map(|proof| ScreenshotPayload {
                filename: &proof.file_name,
                mime_type: proof.image_type.mime(),
                data: proof.to_base64(),
            }),
        };

        let res = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Submission endpoint unreachable: {}", e);
                SubmissionError::SubmissionFailed(UNREACHABLE_MESSAGE.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        let reply = serde_json::from_str::<UpstreamReply>(&body).ok();

        match reply {
            Some(reply) if status.is_success() && reply.success => Ok(Confirmation {
                reference: reply.reference.unwrap_or_else(Uuid::new_v4),
                ..Confirmation::new(reply.message.unwrap_or_else(|| ACCEPTED_MESSAGE.to_string()))
            }),
            Some(UpstreamReply {
                message: Some(message),
                ..
            }) => Err(SubmissionError::SubmissionFailed(message)),
            _ => {
                warn!("Submission endpoint answered {} with unusable body", status);
                Err(SubmissionError::SubmissionFailed(UNREACHABLE_MESSAGE.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn request() -> CertificateRequest {
        CertificateRequest {
            applicant: Applicant {
                name: "सुनील".to_string(),
                email: "s@example.com".to_string(),
                mobile: None,
            },
            details: CertificateDetails::Destitute {
                destitute_name: "सखुबाई".to_string(),
            },
            payment_proof: None,
        }
    }

    #[tokio::test]
    async fn simulated_backend_always_accepts_at_zero_failure_rate() {
        let backend = SimulatedBackend::new(Duration::ZERO, 0.0);
        let confirmation = backend.submit(&request()).await.unwrap();
        assert_eq!(confirmation.message, ACCEPTED_MESSAGE);
    }

    #[tokio::test]
    async fn simulated_backend_always_fails_at_full_failure_rate() {
        let backend = SimulatedBackend::new(Duration::ZERO, 1.5);
        assert_eq!(
            backend.submit(&request()).await,
            Err(SubmissionError::SubmissionFailed(UNREACHABLE_MESSAGE.to_string()))
        );
    }

    #[tokio::test]
    async fn simulated_backend_waits_for_the_configured_delay() {
        let backend = SimulatedBackend::new(Duration::from_millis(30), 0.0);
        let started = std::time::Instant::now();
        backend.submit(&request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_submission_failure() {
        let submitter = HttpSubmitter::new("http://127.0.0.1:9/dakhala");
        assert_eq!(
            submitter.submit(&request()).await,
            Err(SubmissionError::SubmissionFailed(UNREACHABLE_MESSAGE.to_string()))
        );
    }

    /// Answers one HTTP request with `status` and `body`, handing back the
    /// request body it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/dakhala", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let received = read_request_body(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            received
        });

        (url, handle)
    }

    async fn read_request_body(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return String::new();
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                let start = end + 4;
                if buf.len() >= start + len {
                    return String::from_utf8_lossy(&buf[start..start + len]).into_owned();
                }
            }
        }
    }

    #[tokio::test]
    async fn accepted_reply_becomes_confirmation() {
        let reference = "6f1c1f3e-1f0a-4b8e-9a53-2f4d2b7a9c01";
        let (url, server) = serve_once(
            "200 OK",
            r#"{"success": true, "message": "नोंद झाली", "reference": "6f1c1f3e-1f0a-4b8e-9a53-2f4d2b7a9c01"}"#,
        )
        .await;

        let mut request = request();
        request.payment_proof = Some(
            crate::models::PaymentProof::new("upi.png", Some("image/png"), vec![1, 2, 3], 1024)
                .unwrap(),
        );

        let confirmation = HttpSubmitter::new(url).submit(&request).await.unwrap();
        assert_eq!(confirmation.message, "नोंद झाली");
        assert_eq!(confirmation.reference.to_string(), reference);

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["applicant"]["name"], "सुनील");
        assert_eq!(sent["details"]["type"], "destitute");
        assert_eq!(sent["details"]["destitute_name"], "सखुबाई");
        assert_eq!(sent["paymentScreenshot"]["filename"], "upi.png");
        assert_eq!(sent["paymentScreenshot"]["mimeType"], "image/png");
        assert_eq!(sent["paymentScreenshot"]["data"], "AQID");
    }

    #[tokio::test]
    async fn error_reply_carries_upstream_message() {
        let (url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"success": false, "message": "कार्यालयीन सर्व्हर बंद आहे."}"#,
        )
        .await;

        let result = HttpSubmitter::new(url).submit(&request()).await;
        assert_eq!(
            result,
            Err(SubmissionError::SubmissionFailed("कार्यालयीन सर्व्हर बंद आहे.".to_string()))
        );

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert!(sent.get("paymentScreenshot").is_none());
    }

    #[tokio::test]
    async fn unusable_reply_is_a_submission_failure() {
        let (url, server) = serve_once("200 OK", "<html>maintenance</html>").await;

        let result = HttpSubmitter::new(url).submit(&request()).await;
        assert_eq!(
            result,
            Err(SubmissionError::SubmissionFailed(UNREACHABLE_MESSAGE.to_string()))
        );
        server.await.unwrap();
    }
}
