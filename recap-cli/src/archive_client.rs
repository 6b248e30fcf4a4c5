//! HTTP client for the CourtListener RECAP API

use anyhow::{Context, Result};
use async_trait::async_trait;
use recap_core::config::ArchiveConfig;
use recap_core::{
    ArchiveError, ArchiveService, DocketAvailability, DocumentAvailability, DocumentUpload,
    UploadType,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

const DOCKETS_PATH: &str = "/api/rest/v3/dockets/";
const RECAP_QUERY_PATH: &str = "/api/rest/v3/recap-query/";
const UPLOAD_PATH: &str = "/api/rest/v3/recap/";

/// Docket sources that include data contributed through RECAP
const RECAP_SOURCES: &str = "1,3,5,7,9,11,13,15";

#[derive(Debug, Deserialize)]
struct CaseLookupResponse {
    #[serde(default)]
    results: Vec<Value>,
}

pub struct HttpArchiveClient {
    config: ArchiveConfig,
    client: reqwest::Client,
}

impl HttpArchiveClient {
    pub fn new(config: ArchiveConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.client.get(self.config.absolute_url(path)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.header("Authorization", format!("Token {token}")),
            None => request,
        }
    }

    async fn fetch_json<T>(&self, request: reqwest::RequestBuilder) -> Result<T, ArchiveError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArchiveError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ArchiveError::Decode(e.to_string()))
    }

    async fn upload(&self, form: Form) -> Result<bool, ArchiveError> {
        let request = self
            .authorize(self.client.post(self.config.absolute_url(UPLOAD_PATH)))
            .multipart(form);
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Upload rejected");
            Ok(false)
        }
    }
}

fn transport(e: reqwest::Error) -> ArchiveError {
    ArchiveError::Transport(e.to_string())
}

fn upload_form(upload_type: UploadType, court: &str, pacer_case_id: Option<&str>) -> Form {
    let form = Form::new()
        .text("upload_type", upload_type.code().to_string())
        .text("court", court.to_string());
    match pacer_case_id {
        Some(case) => form.text("pacer_case_id", case.to_string()),
        None => form,
    }
}

fn file_part(bytes: Vec<u8>, filename: &str, mime: &str) -> Result<Part, ArchiveError> {
    Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(mime)
        .map_err(transport)
}

/// `pacer_case_id` of a recap-query record, wherever the endpoint put it
fn case_id_of(record: &Value) -> Option<String> {
    let raw = record
        .pointer("/docket_entry/docket/pacer_case_id")
        .or_else(|| record.get("pacer_case_id"))?;
    match raw {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[async_trait(?Send)]
impl ArchiveService for HttpArchiveClient {
    async fn docket_availability(
        &self,
        court: &str,
        pacer_case_id: &str,
    ) -> Result<DocketAvailability, ArchiveError> {
        let request = self.get(DOCKETS_PATH).query(&[
            ("pacer_case_id", pacer_case_id),
            ("source__in", RECAP_SOURCES),
            ("court", court),
            ("fields", "absolute_url,date_modified"),
        ]);
        self.fetch_json(request).await
    }

    async fn document_availability(
        &self,
        pacer_doc_ids: &[String],
        court: &str,
    ) -> Result<DocumentAvailability, ArchiveError> {
        let ids = pacer_doc_ids.join(",");
        let request = self.get(RECAP_QUERY_PATH).query(&[
            ("pacer_doc_id__in", ids.as_str()),
            ("docket_entry__docket__court", court),
        ]);
        self.fetch_json(request).await
    }

    async fn upload_docket(
        &self,
        court: &str,
        pacer_case_id: &str,
        html: &str,
    ) -> Result<bool, ArchiveError> {
        let form = upload_form(UploadType::Docket, court, Some(pacer_case_id)).part(
            "filepath_local",
            file_part(html.as_bytes().to_vec(), "docket.html", "text/html")?,
        );
        self.upload(form).await
    }

    async fn upload_attachment_menu(
        &self,
        court: &str,
        pacer_case_id: Option<&str>,
        html: &str,
    ) -> Result<bool, ArchiveError> {
        let form = upload_form(UploadType::AttachmentPage, court, pacer_case_id).part(
            "filepath_local",
            file_part(html.as_bytes().to_vec(), "attachment_menu.html", "text/html")?,
        );
        self.upload(form).await
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<bool, ArchiveError> {
        let mut form = upload_form(UploadType::Pdf, &upload.court, Some(&upload.pacer_case_id))
            .text("pacer_doc_id", upload.pacer_doc_id.clone())
            .text("document_number", upload.document_number.clone());
        if let Some(attachment) = &upload.attachment_number {
            form = form.text("attachment_number", attachment.clone());
        }
        let filename = format!("{}.pdf", upload.pacer_doc_id);
        let form = form.part(
            "filepath_local",
            file_part(upload.bytes, &filename, "application/pdf")?,
        );
        self.upload(form).await
    }

    async fn case_id_for_document(
        &self,
        court: &str,
        pacer_doc_id: &str,
    ) -> Result<Option<String>, ArchiveError> {
        let request = self.get(RECAP_QUERY_PATH).query(&[
            ("pacer_doc_id", pacer_doc_id),
            ("docket_entry__docket__court", court),
        ]);
        let response: CaseLookupResponse = self.fetch_json(request).await?;
        Ok(response.results.iter().find_map(case_id_of))
    }
}
