//! Client for the external prediction service.
//!
//! One multipart POST per request, no retries. The service is opaque: the
//! response JSON is decoded as-is and missing optional fields stay `None`
//! until display time.

use std::path::Path;

use serde::Deserialize;

use crate::http_client;

/// Multipart field name the service expects the file under.
const IMAGE_FIELD_NAME: &str = "image";
/// Upper bound for prediction response bodies.
const MAX_RESPONSE_BYTES: usize = 256 * 1024;

/// A user-selected file staged for upload.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    /// Original filename, forwarded in the multipart part header.
    pub file_name: String,
    /// Raw file bytes, sent untouched.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Stage a file from disk without inspecting its contents.
    pub fn from_path(path: &Path) -> Result<Self, std::io::Error> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { file_name, bytes })
    }
}

/// Classification returned by the service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Prediction {
    pub class_name: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// Errors from a single prediction exchange.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Network-level failure before a response arrived.
    #[error("Could not reach the prediction service: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("Prediction service error (HTTP {code}): {message}")]
    Status { code: u16, message: String },
    /// The response body was not the expected JSON.
    #[error("Unexpected response from the prediction service: {0}")]
    Json(String),
    /// The response body exceeded the size bound or could not be read.
    #[error("Failed to read prediction response: {0}")]
    Read(String),
}

/// Upload an image and await the classification.
///
/// Callers must ensure an image is actually staged; this function never
/// fabricates a warning for the no-file case.
pub fn predict(predict_url: &str, upload: &ImageUpload) -> Result<Prediction, PredictError> {
    let boundary = multipart_boundary();
    let body = encode_multipart(&boundary, IMAGE_FIELD_NAME, upload);
    let content_type = format!("multipart/form-data; boundary={boundary}");

    tracing::debug!(
        url = predict_url,
        file = upload.file_name.as_str(),
        bytes = upload.bytes.len(),
        "Sending prediction request"
    );

    let response = match http_client::agent()
        .post(predict_url)
        .set("Accept", "application/json")
        .set("Content-Type", &content_type)
        .send_bytes(&body)
    {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default();
            return Err(PredictError::Status {
                code,
                message: status_message(code, &body),
            });
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(PredictError::Transport(err.to_string()));
        }
    };

    let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
        .map_err(|err| PredictError::Read(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| PredictError::Json(err.to_string()))
}

/// Error body shape the service uses for 4xx/5xx answers.
#[derive(Debug, Deserialize)]
struct ErrorBodyWire {
    error: Option<String>,
    message: Option<String>,
}

fn status_message(code: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(wire) = serde_json::from_str::<ErrorBodyWire>(trimmed) {
        if let Some(message) = wire.error.or(wire.message) {
            return message;
        }
    }
    if trimmed.is_empty() {
        format!("HTTP {code}")
    } else {
        trimmed.to_string()
    }
}

fn multipart_boundary() -> String {
    format!("skinalyze-{}", uuid::Uuid::new_v4().simple())
}

fn encode_multipart(boundary: &str, field: &str, upload: &ImageUpload) -> Vec<u8> {
    let mime = mime_for_file_name(&upload.file_name);
    let mut body = Vec::with_capacity(upload.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{}\"\r\n",
            sanitize_file_name(&upload.file_name)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
    body.extend_from_slice(&upload.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Best-effort MIME guess; the service only cares about the field name, so
/// unknown extensions fall back to a generic type rather than being rejected.
fn mime_for_file_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.replace(['"', '\r', '\n'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                read_multipart_request(&mut stream);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/predict", addr)
    }

    // Consume the request until the closing multipart boundary so the
    // client never sees the connection reset mid-send.
    fn read_multipart_request(stream: &mut std::net::TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 8 * 1024];
        for _ in 0..64 {
            match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    data.extend_from_slice(&buf[..n]);
                    if data.ends_with(b"--\r\n") {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    }

    fn sample_upload() -> ImageUpload {
        ImageUpload {
            file_name: "lesion.png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[test]
    fn multipart_body_carries_field_filename_and_bytes() {
        let upload = sample_upload();
        let body = encode_multipart("XYZ", IMAGE_FIELD_NAME, &upload);
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--XYZ\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"image\"; filename=\"lesion.png\""));
        assert!(text.contains("Content-Type: image/png"));
        assert!(text.ends_with("\r\n--XYZ--\r\n"));
        let payload_start = body
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .unwrap()
            + 4;
        assert_eq!(&body[payload_start..payload_start + 4], &upload.bytes[..]);
    }

    #[test]
    fn boundary_is_unique_per_request() {
        assert_ne!(multipart_boundary(), multipart_boundary());
    }

    #[test]
    fn mime_guess_covers_common_image_types() {
        assert_eq!(mime_for_file_name("a.JPG"), "image/jpeg");
        assert_eq!(mime_for_file_name("b.webp"), "image/webp");
        assert_eq!(mime_for_file_name("noext"), "application/octet-stream");
    }

    #[test]
    fn quoted_filenames_are_sanitized() {
        assert_eq!(sanitize_file_name("a\"b\r\n.png"), "a_b__.png");
    }

    #[test]
    fn decodes_full_prediction() {
        let url = serve_once(json_response(
            "{\"class_name\":\"Melanoma\",\"confidence\":0.8731,\
             \"description\":\"desc\",\"treatment\":\"treat\",\"recommendation\":\"rec\"}",
        ));
        let prediction = predict(&url, &sample_upload()).unwrap();
        assert_eq!(prediction.class_name, "Melanoma");
        assert_eq!(prediction.confidence, 0.8731);
        assert_eq!(prediction.description.as_deref(), Some("desc"));
    }

    #[test]
    fn missing_optional_fields_decode_to_none() {
        let url = serve_once(json_response(
            "{\"class_name\":\"Psoriasis\",\"confidence\":0.5}",
        ));
        let prediction = predict(&url, &sample_upload()).unwrap();
        assert_eq!(prediction.class_name, "Psoriasis");
        assert!(prediction.description.is_none());
        assert!(prediction.treatment.is_none());
        assert!(prediction.recommendation.is_none());
    }

    #[test]
    fn error_body_message_is_surfaced_for_bad_status() {
        let body = "{\"error\":\"No file uploaded\"}";
        let url = serve_once(format!(
            "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ));
        let err = predict(&url, &sample_upload()).unwrap_err();
        match err {
            PredictError::Status { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "No file uploaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_success_body_is_a_json_error() {
        let url = serve_once(json_response("<html>not json</html>"));
        let err = predict(&url, &sample_upload()).unwrap_err();
        assert!(matches!(err, PredictError::Json(_)));
    }

    #[test]
    fn connection_refusal_is_a_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let url = format!("http://{}/predict", addr);
        let err = predict(&url, &sample_upload()).unwrap_err();
        assert!(matches!(err, PredictError::Transport(_)));
    }
}
