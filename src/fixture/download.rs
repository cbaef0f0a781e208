use color_eyre::{Result, eyre::WrapErr};
use log::info;
use reqwest::{
    blocking::{Client, Response},
    header::CONTENT_TYPE,
};
use std::{fs::File, path::Path};

const DRIVE_EXPORT_URL: &str = "https://docs.google.com/uc?export=download";

/// Retrieves a remote file by identifier and writes its bytes to `dest`.
pub trait RemoteFetch {
    fn fetch(&self, file_id: &str, dest: &Path) -> Result<()>;
}

/// Downloads publicly shared Google Drive files.
pub struct GoogleDrive {
    client: Client,
}

impl GoogleDrive {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    fn request(&self, file_id: &str, confirm: Option<&str>) -> Result<Response> {
        let mut query = vec![("id", file_id)];
        if let Some(token) = confirm {
            query.push(("confirm", token));
        }
        let response = self
            .client
            .get(DRIVE_EXPORT_URL)
            .query(&query)
            .send()
            .wrap_err_with(|| format!("Request for Drive file {file_id} failed"))?
            .error_for_status()
            .wrap_err_with(|| format!("Drive refused file {file_id}"))?;
        Ok(response)
    }
}

/// Large files answer with a virus-scan warning instead of the payload; the token
/// to bypass it comes either as a cookie or, on newer pages, is implied by an HTML body.
fn confirm_token(response: &Response) -> Option<String> {
    if let Some(cookie) = response
        .cookies()
        .find(|cookie| cookie.name().starts_with("download_warning"))
    {
        return Some(cookie.value().to_owned());
    }
    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"));
    is_html.then(|| "t".to_owned())
}

impl RemoteFetch for GoogleDrive {
    fn fetch(&self, file_id: &str, dest: &Path) -> Result<()> {
        let mut response = self.request(file_id, None)?;
        if let Some(token) = confirm_token(&response) {
            info!("Confirming download of large Drive file {file_id}");
            response = self.request(file_id, Some(&token))?;
        }

        let mut file = File::create(dest).wrap_err_with(|| format!("Failed to create {dest:?}"))?;
        let bytes = response
            .copy_to(&mut file)
            .wrap_err_with(|| format!("Failed to write {dest:?}"))?;
        info!("Downloaded {bytes} bytes to {dest:?}");
        Ok(())
    }
}
